//! Audio capability used by the tone registry.
//!
//! Ramps are fire-and-forget: the sink schedules a linear move from the
//! parameter's current value to `target` over `ramp` and returns at once.
//! A zero `ramp` sets the value immediately.

use crate::config::Waveform;
use crate::error::SinkError;
use std::time::Duration;

pub trait AudioSink {
    /// Builds one continuously running oscillator and its gain stage, routed
    /// into the master gain.
    fn create_tone(
        &mut self,
        id: &str,
        waveform: Waveform,
        frequency_hz: f32,
        gain: f32,
    ) -> Result<(), SinkError>;

    fn set_gain(&mut self, id: &str, target: f32, ramp: Duration);

    fn set_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration);

    fn set_master_gain(&mut self, target: f32, ramp: Duration);
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    CreateTone {
        id: String,
        waveform: Waveform,
        frequency_hz: f32,
        gain: f32,
    },
    Gain {
        id: String,
        target: f32,
        ramp: Duration,
    },
    Frequency {
        id: String,
        target_hz: f32,
        ramp: Duration,
    },
    Master {
        target: f32,
        ramp: Duration,
    },
}

/// Sink that only records what it was asked to do.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn last_gain(&self, id: &str) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::Gain { id: i, target, .. } if i == id => Some(*target),
            SinkCall::CreateTone { id: i, gain, .. } if i == id => Some(*gain),
            _ => None,
        })
    }

    pub fn last_frequency(&self, id: &str) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::Frequency { id: i, target_hz, .. } if i == id => Some(*target_hz),
            SinkCall::CreateTone {
                id: i, frequency_hz, ..
            } if i == id => Some(*frequency_hz),
            _ => None,
        })
    }

    pub fn last_master(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::Master { target, .. } => Some(*target),
            _ => None,
        })
    }
}

impl AudioSink for RecordingSink {
    fn create_tone(
        &mut self,
        id: &str,
        waveform: Waveform,
        frequency_hz: f32,
        gain: f32,
    ) -> Result<(), SinkError> {
        self.calls.push(SinkCall::CreateTone {
            id: id.to_string(),
            waveform,
            frequency_hz,
            gain,
        });
        Ok(())
    }

    fn set_gain(&mut self, id: &str, target: f32, ramp: Duration) {
        self.calls.push(SinkCall::Gain {
            id: id.to_string(),
            target,
            ramp,
        });
    }

    fn set_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration) {
        self.calls.push(SinkCall::Frequency {
            id: id.to_string(),
            target_hz,
            ramp,
        });
    }

    fn set_master_gain(&mut self, target: f32, ramp: Duration) {
        self.calls.push(SinkCall::Master { target, ramp });
    }
}
