//! Price scales: price -> frequency for the oscillators, price -> color for the map.
//!
//! Both are piecewise-linear over ascending domain stops and extrapolate past
//! the outermost stops. NaN prices flow through untouched.

use crate::constants::{BRIGHTEN_FLOOR, SHADE_FACTOR};
use crate::error::ConfigError;

/// Piecewise-linear map from ascending domain stops onto range stops.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: Vec<f64>,
    range: Vec<f64>,
}

impl LinearScale {
    pub fn new(domain: Vec<f64>, range: Vec<f64>) -> Result<Self, ConfigError> {
        if domain.len() < 2 || domain.len() != range.len() {
            return Err(ConfigError::DegenerateCalibration);
        }
        if domain.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(ConfigError::UnorderedStops);
        }
        Ok(Self { domain, range })
    }

    /// Index of the segment `x` falls in; values outside the domain use the
    /// first or last segment so they extrapolate.
    pub fn segment(&self, x: f64) -> usize {
        let last = self.domain.len() - 2;
        self.domain[1..=last]
            .iter()
            .take_while(|&&stop| stop <= x)
            .count()
    }

    pub fn fraction(&self, x: f64) -> (usize, f64) {
        let i = self.segment(x);
        let (d0, d1) = (self.domain[i], self.domain[i + 1]);
        (i, (x - d0) / (d1 - d0))
    }

    pub fn map(&self, x: f64) -> f64 {
        let (i, t) = self.fraction(x);
        lerp(self.range[i], self.range[i + 1], t)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyMapper {
    scale: LinearScale,
}

impl FrequencyMapper {
    pub fn new(domain: [f64; 2], range_hz: [f64; 2]) -> Result<Self, ConfigError> {
        if domain[0] == domain[1] {
            return Err(ConfigError::DegenerateCalibration);
        }
        Ok(Self {
            scale: LinearScale::new(domain.to_vec(), range_hz.to_vec())?,
        })
    }

    pub fn frequency_hz(&self, price: f64) -> f32 {
        self.scale.map(price) as f32
    }
}

/// RGB color with unclamped floating channels in 0..=255 space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses the handful of CSS names the color stops use, or `#rrggbb`.
    pub fn parse(s: &str) -> Option<Self> {
        let named = match s.to_ascii_lowercase().as_str() {
            "black" => Some(Self::new(0.0, 0.0, 0.0)),
            "white" => Some(Self::new(255.0, 255.0, 255.0)),
            "blue" => Some(Self::new(0.0, 0.0, 255.0)),
            "green" => Some(Self::new(0.0, 128.0, 0.0)),
            "yellow" => Some(Self::new(255.0, 255.0, 0.0)),
            "orange" => Some(Self::new(255.0, 165.0, 0.0)),
            "red" => Some(Self::new(255.0, 0.0, 0.0)),
            _ => None,
        };
        if named.is_some() {
            return named;
        }
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(f64::from);
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    pub fn brighter(self) -> Self {
        if self.r == 0.0 && self.g == 0.0 && self.b == 0.0 {
            return Self::new(BRIGHTEN_FLOOR, BRIGHTEN_FLOOR, BRIGHTEN_FLOOR);
        }
        let lift = |c: f64| {
            // f64::min would swallow NaN and turn a missing price white.
            if c.is_nan() {
                return c;
            }
            let c = if c > 0.0 && c < BRIGHTEN_FLOOR { BRIGHTEN_FLOOR } else { c };
            (c / SHADE_FACTOR).min(255.0)
        };
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }

    pub fn darker(self) -> Self {
        Self::new(
            self.r * SHADE_FACTOR,
            self.g * SHADE_FACTOR,
            self.b * SHADE_FACTOR,
        )
    }

    /// `#rrggbb` with channels truncated; a non-finite channel prints as
    /// `NaN`, which CSS ignores.
    pub fn to_hex(&self) -> String {
        fn channel(c: f64) -> String {
            if c.is_finite() {
                format!("{:02x}", c.trunc().clamp(0.0, 255.0) as u8)
            } else {
                "NaN".to_string()
            }
        }
        format!("#{}{}{}", channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn to_rgb8(&self) -> Option<[u8; 3]> {
        if !self.is_finite() {
            return None;
        }
        let c = |v: f64| v.trunc().clamp(0.0, 255.0) as u8;
        Some([c(self.r), c(self.g), c(self.b)])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorMapper {
    scale: LinearScale,
    colors: Vec<Rgb>,
}

impl ColorMapper {
    pub fn new(stops: &[(f64, &str)]) -> Result<Self, ConfigError> {
        let colors = stops
            .iter()
            .map(|(_, name)| Rgb::parse(name).ok_or_else(|| ConfigError::UnknownColor(name.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        let domain: Vec<f64> = stops.iter().map(|(p, _)| *p).collect();
        // Range is the stop index; channels are interpolated from the fraction.
        let range: Vec<f64> = (0..stops.len()).map(|i| i as f64).collect();
        Ok(Self {
            scale: LinearScale::new(domain, range)?,
            colors,
        })
    }

    /// Interpolated color, each channel rounded to a whole value.
    pub fn color(&self, price: f64) -> Rgb {
        let (i, t) = self.scale.fraction(price);
        let (a, b) = (self.colors[i], self.colors[i + 1]);
        let channel = |x: f64, y: f64| lerp(x, y, t).round();
        Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
    }

    pub fn shaded(&self, price: f64, enabled: bool) -> Rgb {
        shade(self.color(price), enabled)
    }
}

#[inline]
pub fn shade(color: Rgb, enabled: bool) -> Rgb {
    if enabled {
        color.brighter()
    } else {
        color.darker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLOR_STOPS, FREQUENCY_DOMAIN, FREQUENCY_RANGE_HZ};

    fn freq() -> FrequencyMapper {
        FrequencyMapper::new(FREQUENCY_DOMAIN, FREQUENCY_RANGE_HZ).unwrap()
    }

    #[test]
    fn frequency_hits_calibration_points() {
        let f = freq();
        assert!((f.frequency_hz(0.4) - 100.0).abs() < 1e-3);
        assert!((f.frequency_hz(4.4) - 1000.0).abs() < 1e-3);
        assert!((f.frequency_hz(2.4) - 550.0).abs() < 1e-3);
    }

    #[test]
    fn frequency_extrapolates_and_propagates_nan() {
        let f = freq();
        assert!((f.frequency_hz(0.0) - 10.0).abs() < 1e-3);
        assert!((f.frequency_hz(5.4) - 1225.0).abs() < 1e-3);
        assert!(f.frequency_hz(f64::NAN).is_nan());
    }

    #[test]
    fn color_stops_map_exactly() {
        let c = ColorMapper::new(&COLOR_STOPS).unwrap();
        assert_eq!(c.color(0.25).to_hex(), "#0000ff");
        assert_eq!(c.color(1.25).to_hex(), "#008000");
        assert_eq!(c.color(2.25).to_hex(), "#ffff00");
        assert_eq!(c.color(3.25).to_hex(), "#ffa500");
        assert_eq!(c.color(4.25).to_hex(), "#ff0000");
    }

    #[test]
    fn color_interpolates_between_stops() {
        let c = ColorMapper::new(&COLOR_STOPS).unwrap();
        // halfway between green (0,128,0) and yellow (255,255,0)
        let mid = c.color(1.75);
        assert_eq!(mid, Rgb::new(128.0, 192.0, 0.0));
    }

    #[test]
    fn nan_price_stays_nan_after_shading() {
        let c = ColorMapper::new(&COLOR_STOPS).unwrap();
        for enabled in [true, false] {
            let shaded = c.shaded(f64::NAN, enabled);
            assert!(shaded.r.is_nan() && shaded.g.is_nan() && shaded.b.is_nan());
            assert_eq!(shaded.to_rgb8(), None);
            assert_eq!(shaded.to_hex(), "#NaNNaNNaN");
        }
    }

    #[test]
    fn shaded_channels_are_truncated() {
        let c = ColorMapper::new(&COLOR_STOPS).unwrap();
        // green 128 * 0.7 = 89.6
        assert_eq!(c.shaded(1.25, false).to_hex(), "#005900");
        assert_eq!(c.shaded(1.25, false).to_rgb8(), Some([0, 89, 0]));
        // 128 / 0.7 = 182.86
        assert_eq!(c.shaded(1.25, true).to_hex(), "#00b600");
    }

    #[test]
    fn nan_price_renders_as_nan_hex() {
        let c = ColorMapper::new(&COLOR_STOPS).unwrap();
        let col = c.color(f64::NAN);
        assert!(!col.is_finite());
        assert_eq!(col.to_hex(), "#NaNNaNNaN");
        assert_eq!(col.to_rgb8(), None);
    }

    #[test]
    fn brighter_and_darker_follow_shade_factor() {
        let blue = Rgb::parse("blue").unwrap();
        let bright = blue.brighter();
        assert_eq!(bright.r, 0.0);
        assert_eq!(bright.b, 255.0);
        let dark = blue.darker();
        assert!((dark.b - 178.5).abs() < 1e-9);
        let black = Rgb::parse("black").unwrap().brighter();
        assert_eq!(black, Rgb::new(30.0, 30.0, 30.0));
        let dim = Rgb::new(10.0, 100.0, 0.0).brighter();
        assert!((dim.r - 30.0 / 0.7).abs() < 1e-9);
        assert_eq!(dim.b, 0.0);
    }

    #[test]
    fn parse_rejects_unknown_and_reads_hex() {
        assert_eq!(Rgb::parse("chartreuse-ish"), None);
        assert_eq!(Rgb::parse("#10ff00"), Some(Rgb::new(16.0, 255.0, 0.0)));
        assert!(ColorMapper::new(&[(0.0, "blue"), (1.0, "mauve")]).is_err());
    }

    #[test]
    fn scale_rejects_unordered_domain() {
        assert_eq!(
            LinearScale::new(vec![1.0, 0.5], vec![0.0, 1.0]),
            Err(ConfigError::UnorderedStops)
        );
        assert_eq!(
            FrequencyMapper::new([1.0, 1.0], [100.0, 200.0]),
            Err(ConfigError::DegenerateCalibration)
        );
    }
}
