//! Terminal stand-in for the choropleth: one line per frame with a colored
//! chip per entity.

use crossterm::style::{Color, Stylize};
use std::io::Write;
use tones_core::{ColorMapper, Readout, Record, Renderer, ToneLookup};

pub struct TerminalRenderer<W: Write> {
    out: W,
    colors: ColorMapper,
    headline_entity: String,
    styled: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, colors: ColorMapper, headline_entity: String, styled: bool) -> Self {
        Self {
            out,
            colors,
            headline_entity,
            styled,
        }
    }

    /// One chip: the id on its shaded map color, or `[ID]`/`ID` when unstyled.
    pub fn chip(&self, id: &str, price: f64, enabled: bool) -> String {
        let shade = self.colors.shaded(price, enabled);
        match (self.styled, shade.to_rgb8()) {
            (true, Some([r, g, b])) => {
                let fg = if enabled { Color::Black } else { Color::White };
                format!("{}", format!(" {id} ").with(fg).on(Color::Rgb { r, g, b }))
            }
            _ if enabled => format!("[{id}]"),
            _ => format!(" {id} "),
        }
    }

    pub fn line(&self, index: usize, record: &Record, tones: &dyn ToneLookup) -> String {
        let readout = Readout::from_record(record, &self.headline_entity);
        let chips: String = record
            .entities()
            .map(|(id, price)| self.chip(id, price, tones.is_enabled(id)))
            .collect();
        format!(
            "{:>4} {:<9} {} {:>7} {}",
            index,
            readout.month,
            readout.year,
            readout.price.unwrap_or_default(),
            chips
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, index: usize, record: &Record, tones: &dyn ToneLookup) {
        let line = self.line(index, record, tones);
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            log::warn!("[render] write failed: {e}");
        }
    }

    fn playback_changed(&mut self, playing: bool) {
        log::info!("[render] {}", if playing { "playing" } else { "paused" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tones_core::EngineConfig;

    struct OnlyUs;

    impl ToneLookup for OnlyUs {
        fn is_enabled(&self, id: &str) -> bool {
            id == "US"
        }
    }

    fn plain() -> TerminalRenderer<Vec<u8>> {
        let cfg = EngineConfig::default();
        TerminalRenderer::new(Vec::new(), cfg.color_mapper().unwrap(), "US".into(), false)
    }

    #[test]
    fn plain_line_marks_enabled_entities() {
        let mut r = plain();
        let rec = Record::new("2", "2001").with_price("US", 1.5).with_price("CA", 1.75);
        r.render(3, &rec, &OnlyUs);
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("February"));
        assert!(text.contains("2001"));
        assert!(text.contains("$1.500"));
        assert!(text.contains("[US]"));
        assert!(text.contains(" CA "));
        assert!(!text.contains("[CA]"));
    }

    #[test]
    fn styled_chip_falls_back_for_nan_price() {
        let cfg = EngineConfig::default();
        let r = TerminalRenderer::new(Vec::new(), cfg.color_mapper().unwrap(), "US".into(), true);
        assert_eq!(r.chip("NV", f64::NAN, true), "[NV]");
        assert!(r.chip("NV", 2.0, false).contains("NV"));
    }
}
