//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tones_core::{EngineConfig, Waveform};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gas-tones")]
#[command(about = "Play historical U.S. gasoline prices as tones", long_about = None)]
pub struct Args {
    /// CSV with Month, Year and one price column per state
    #[arg(value_name = "CSV")]
    pub data: PathBuf,

    /// Milliseconds between frames
    #[arg(long, value_name = "MS", default_value_t = tones_core::TICK_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Gain of an enabled tone
    #[arg(long, value_name = "GAIN", default_value_t = tones_core::ENABLED_GAIN)]
    pub enabled_gain: f32,

    /// Entity audible at startup
    #[arg(long, value_name = "ID", default_value = tones_core::DEFAULT_ENTITY)]
    pub default_entity: String,

    /// Oscillator shape: sine, square, saw or triangle
    #[arg(long, value_name = "SHAPE", default_value = "triangle")]
    pub waveform: Waveform,

    /// Run without opening an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Start playing immediately and exit when the data runs out
    #[arg(long)]
    pub autoplay: bool,

    /// Print plain text instead of colored chips
    #[arg(long)]
    pub plain: bool,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tick_interval: Duration::from_millis(self.interval_ms),
            enabled_gain: self.enabled_gain,
            default_entity: self.default_entity.clone(),
            waveform: self.waveform,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let args = Args::parse_from(["gas-tones", "data.csv"]);
        assert_eq!(args.engine_config(), EngineConfig::default());
        assert!(!args.no_audio);
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "gas-tones",
            "data.csv",
            "--interval-ms",
            "100",
            "--default-entity",
            "CA",
            "--no-audio",
            "--waveform",
            "square",
        ]);
        let cfg = args.engine_config();
        assert_eq!(cfg.tick_interval, Duration::from_millis(100));
        assert_eq!(cfg.default_entity, "CA");
        assert_eq!(cfg.waveform, Waveform::Square);
        assert!(args.no_audio);
    }

    #[test]
    fn unknown_waveform_is_rejected() {
        let res = Args::try_parse_from(["gas-tones", "data.csv", "--waveform", "pulse"]);
        assert!(res.is_err());
    }
}
