// Shared audio/visual tuning constants used by both web and native frontends.

// Playback
pub const TICK_INTERVAL_MS: u64 = 250; // one frame per tick

// Ramps (seconds on the audio clock)
pub const GAIN_RAMP_SEC: f64 = 0.5; // per-entity on/off fade
pub const FREQUENCY_RAMP_SEC: f64 = 0.25; // pitch glide between frames
pub const MASTER_RAMP_SEC: f64 = 0.25; // global fade on play/pause

// Levels
pub const ENABLED_GAIN: f32 = 0.1; // per-entity gain when audible
pub const MASTER_GAIN_ON: f32 = 1.0;

// Dataset layout
pub const MONTH_FIELD: &str = "Month";
pub const YEAR_FIELD: &str = "Year";
pub const DEFAULT_ENTITY: &str = "US"; // starts audible
pub const HEADLINE_ENTITY: &str = "US"; // shown in the price readout

// Price -> frequency calibration (price in dollars, frequency in Hz)
pub const FREQUENCY_DOMAIN: [f64; 2] = [0.4, 4.4];
pub const FREQUENCY_RANGE_HZ: [f64; 2] = [100.0, 1000.0];

// Price -> color stops
pub const COLOR_STOPS: [(f64, &str); 5] = [
    (0.25, "blue"),
    (1.25, "green"),
    (2.25, "yellow"),
    (3.25, "orange"),
    (4.25, "red"),
];

// Shading of enabled/disabled regions
pub const SHADE_FACTOR: f64 = 0.7;
pub const BRIGHTEN_FLOOR: f64 = 30.0; // channels below this are lifted before brightening
