use thiserror::Error;

/// Failures raised by the tone registry and playback engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A toggle or retune referenced an id that has no tone.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),
    /// Playback was requested before any frame was loaded.
    #[error("dataset not loaded")]
    DataUnavailable,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Failures while loading the price table.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,
    #[error("header is missing the `{0}` column")]
    MissingField(&'static str),
    #[error("header repeats the `{0}` column")]
    DuplicateField(String),
    #[error("line {line}: expected {expected} fields, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("frequency calibration needs two distinct prices")]
    DegenerateCalibration,
    #[error("color stops must be strictly ascending")]
    UnorderedStops,
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    #[error("unknown waveform `{0}`")]
    UnknownWaveform(String),
}

/// An audio backend could not build or address a node.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("audio sink: {0}")]
pub struct SinkError(pub String);
