// Page wiring shared by the web frontend: element ids, selectors and assets.

// Data
pub const DATA_URL: &str = "fp/gasdata.csv";

// Readouts
pub const PRICE_SPAN_ID: &str = "spanPrice";
pub const MONTH_SPAN_ID: &str = "spanMonth";
pub const YEAR_SPAN_ID: &str = "spanYear";

// Controls
pub const PLAY_BUTTON_ID: &str = "btnPlay";
pub const RESET_BUTTON_ID: &str = "btnReset";
pub const PLAY_LABEL: &str = "Play";
pub const PAUSE_LABEL: &str = "Pause";

// Map: every clickable region carries its entity id in this attribute
pub const MAP_CONTAINER_ID: &str = "map";
pub const ENTITY_ATTR: &str = "data-entity";
