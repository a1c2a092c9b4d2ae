//! Engine tuning, defaulted from [`crate::constants`].
//!
//! Front-ends start from `EngineConfig::default()` and override the fields
//! they expose (the native CLI maps its flags onto these).

use crate::constants::*;
use crate::error::ConfigError;
use crate::mapping::{ColorMapper, FrequencyMapper};
use std::str::FromStr;
use std::time::Duration;

/// Oscillator shape shared by every tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    #[default]
    Triangle,
}

impl FromStr for Waveform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" => Ok(Self::Sine),
            "square" => Ok(Self::Square),
            "saw" | "sawtooth" => Ok(Self::Saw),
            "triangle" => Ok(Self::Triangle),
            _ => Err(ConfigError::UnknownWaveform(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub gain_ramp: Duration,
    pub frequency_ramp: Duration,
    pub master_ramp: Duration,
    pub enabled_gain: f32,
    pub default_entity: String,
    pub headline_entity: String,
    pub month_field: String,
    pub year_field: String,
    pub frequency_domain: [f64; 2],
    pub frequency_range_hz: [f64; 2],
    pub color_stops: Vec<(f64, String)>,
    pub waveform: Waveform,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            gain_ramp: Duration::from_secs_f64(GAIN_RAMP_SEC),
            frequency_ramp: Duration::from_secs_f64(FREQUENCY_RAMP_SEC),
            master_ramp: Duration::from_secs_f64(MASTER_RAMP_SEC),
            enabled_gain: ENABLED_GAIN,
            default_entity: DEFAULT_ENTITY.to_string(),
            headline_entity: HEADLINE_ENTITY.to_string(),
            month_field: MONTH_FIELD.to_string(),
            year_field: YEAR_FIELD.to_string(),
            frequency_domain: FREQUENCY_DOMAIN,
            frequency_range_hz: FREQUENCY_RANGE_HZ,
            color_stops: COLOR_STOPS
                .iter()
                .map(|(p, c)| (*p, c.to_string()))
                .collect(),
            waveform: Waveform::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::NonPositive("tick interval"));
        }
        if self.gain_ramp.is_zero() {
            return Err(ConfigError::NonPositive("gain ramp"));
        }
        if self.frequency_ramp.is_zero() {
            return Err(ConfigError::NonPositive("frequency ramp"));
        }
        if self.master_ramp.is_zero() {
            return Err(ConfigError::NonPositive("master ramp"));
        }
        if !(self.enabled_gain > 0.0) {
            return Err(ConfigError::NonPositive("enabled gain"));
        }
        self.frequency_mapper()?;
        self.color_mapper()?;
        Ok(())
    }

    pub fn frequency_mapper(&self) -> Result<FrequencyMapper, ConfigError> {
        FrequencyMapper::new(self.frequency_domain, self.frequency_range_hz)
    }

    pub fn color_mapper(&self) -> Result<ColorMapper, ConfigError> {
        let stops: Vec<(f64, &str)> = self
            .color_stops
            .iter()
            .map(|(p, c)| (*p, c.as_str()))
            .collect();
        ColorMapper::new(&stops)
    }

    /// Whether a column names a sonified entity rather than a date field.
    pub fn is_entity_field(&self, field: &str) -> bool {
        field != self.month_field && field != self.year_field
    }
}
