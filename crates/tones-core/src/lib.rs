pub mod audio;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod mapping;
pub mod playback;
pub mod readout;
pub mod tones;

pub use audio::*;
pub use config::*;
pub use constants::*;
pub use dataset::*;
pub use error::*;
pub use mapping::*;
pub use playback::*;
pub use readout::*;
pub use tones::*;
