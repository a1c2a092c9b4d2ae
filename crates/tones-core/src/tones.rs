//! Tone registry: one always-running oscillator per entity.
//!
//! Oscillators are never stopped. Muting is done by ramping gain so toggles
//! stay click-free, and silent tones keep receiving frequency updates so they
//! come in at the right pitch when enabled.

use crate::audio::AudioSink;
use crate::config::EngineConfig;
use crate::constants::MASTER_GAIN_ON;
use crate::dataset::Record;
use crate::error::EngineError;
use crate::mapping::FrequencyMapper;
use fnv::FnvHashMap;
use std::time::Duration;

/// Per-entity tone bookkeeping; the audio nodes themselves live in the sink.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneState {
    pub id: String,
    pub frequency_hz: f32,
    pub gain: f32,
    pub is_on: bool,
}

/// Read-only view renderers use to shade regions.
pub trait ToneLookup {
    fn is_enabled(&self, id: &str) -> bool;
}

pub struct ToneRegistry<S: AudioSink> {
    sink: S,
    tones: Vec<ToneState>,
    index: FnvHashMap<String, usize>,
    frequency: FrequencyMapper,
    enabled_gain: f32,
    gain_ramp: Duration,
    frequency_ramp: Duration,
    master_ramp: Duration,
    master_gain: f32,
}

impl<S: AudioSink> ToneRegistry<S> {
    /// Creates a tone for every entity column of `first`, tuned to its price.
    /// Only `config.default_entity` starts audible. The master gain starts at 0.
    pub fn initialize(
        mut sink: S,
        first: &Record,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let frequency = config.frequency_mapper()?;
        let mut tones = Vec::with_capacity(first.entity_count());
        let mut index = FnvHashMap::default();
        for (id, price) in first.entities() {
            if index.contains_key(id) {
                log::warn!("[tones] duplicate entity {} ignored", id);
                continue;
            }
            let is_on = id == config.default_entity;
            let gain = if is_on { config.enabled_gain } else { 0.0 };
            let frequency_hz = frequency.frequency_hz(price);
            sink.create_tone(id, config.waveform, frequency_hz, gain)?;
            index.insert(id.to_string(), tones.len());
            tones.push(ToneState {
                id: id.to_string(),
                frequency_hz,
                gain,
                is_on,
            });
        }
        log::info!(
            "[tones] created {} tones, {} enabled",
            tones.len(),
            tones.iter().filter(|t| t.is_on).count()
        );
        Ok(Self {
            sink,
            tones,
            index,
            frequency,
            enabled_gain: config.enabled_gain,
            gain_ramp: config.gain_ramp,
            frequency_ramp: config.frequency_ramp,
            master_ramp: config.master_ramp,
            master_gain: 0.0,
        })
    }

    fn slot(&self, id: &str) -> Result<usize, EngineError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::UnknownEntity(id.to_string()))
    }

    pub fn set_entity_enabled(&mut self, id: &str, enabled: bool) -> Result<(), EngineError> {
        let i = self.slot(id)?;
        let target = if enabled { self.enabled_gain } else { 0.0 };
        let tone = &mut self.tones[i];
        tone.is_on = enabled;
        tone.gain = target;
        self.sink.set_gain(id, target, self.gain_ramp);
        log::debug!("[tones] {} -> {}", id, if enabled { "on" } else { "off" });
        Ok(())
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, EngineError> {
        let enabled = !self.is_on(id)?;
        self.set_entity_enabled(id, enabled)?;
        Ok(enabled)
    }

    /// Glides every known entity in `record` to the pitch for its price,
    /// whether or not it is audible.
    pub fn update_frequencies(&mut self, record: &Record) {
        for (id, price) in record.entities() {
            let Some(&i) = self.index.get(id) else {
                continue;
            };
            let hz = self.frequency.frequency_hz(price);
            self.tones[i].frequency_hz = hz;
            self.sink.set_frequency(id, hz, self.frequency_ramp);
        }
    }

    pub fn retune(&mut self, id: &str, price: f64) -> Result<(), EngineError> {
        let i = self.slot(id)?;
        let hz = self.frequency.frequency_hz(price);
        self.tones[i].frequency_hz = hz;
        self.sink.set_frequency(id, hz, self.frequency_ramp);
        Ok(())
    }

    pub fn mute_all(&mut self) {
        self.master_gain = 0.0;
        self.sink.set_master_gain(0.0, self.master_ramp);
    }

    /// Snaps enabled tones to the pitch for `record` before fading the master
    /// in, so playback never resumes with a glide from a stale pitch.
    pub fn unmute_all(&mut self, record: &Record) {
        for (id, price) in record.entities() {
            let Some(&i) = self.index.get(id) else {
                continue;
            };
            if !self.tones[i].is_on {
                continue;
            }
            let hz = self.frequency.frequency_hz(price);
            self.tones[i].frequency_hz = hz;
            self.sink.set_frequency(id, hz, Duration::ZERO);
        }
        self.master_gain = MASTER_GAIN_ON;
        self.sink.set_master_gain(MASTER_GAIN_ON, self.master_ramp);
    }

    pub fn count_enabled(&self) -> usize {
        self.tones.iter().filter(|t| t.is_on).count()
    }

    pub fn is_on(&self, id: &str) -> Result<bool, EngineError> {
        Ok(self.tones[self.slot(id)?].is_on)
    }

    pub fn get(&self, id: &str) -> Option<&ToneState> {
        self.index.get(id).map(|&i| &self.tones[i])
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: AudioSink> ToneLookup for ToneRegistry<S> {
    fn is_enabled(&self, id: &str) -> bool {
        self.get(id).map(|t| t.is_on).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingSink, SinkCall};
    use crate::config::Waveform;

    fn first() -> Record {
        Record::new("1", "2000")
            .with_price("US", 2.0)
            .with_price("CA", 2.4)
            .with_price("TX", 0.4)
    }

    fn registry() -> ToneRegistry<RecordingSink> {
        ToneRegistry::initialize(RecordingSink::new(), &first(), &EngineConfig::default())
            .unwrap()
    }

    #[test]
    fn initialize_enables_only_default_entity() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.count_enabled(), 1);
        assert!(reg.is_on("US").unwrap());
        assert!(!reg.is_on("CA").unwrap());
        assert_eq!(reg.get("US").unwrap().gain, 0.1);
        assert_eq!(reg.get("TX").unwrap().gain, 0.0);
        assert!((reg.get("TX").unwrap().frequency_hz - 100.0).abs() < 1e-3);
        assert_eq!(reg.master_gain(), 0.0);
        let created = reg
            .sink()
            .calls
            .iter()
            .filter(|c| matches!(c, SinkCall::CreateTone { waveform: Waveform::Triangle, .. }))
            .count();
        assert_eq!(created, 3);
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let mut reg = registry();
        assert_eq!(
            reg.set_entity_enabled("ZZ", true),
            Err(EngineError::UnknownEntity("ZZ".into()))
        );
        assert!(reg.toggle("ZZ").is_err());
        assert!(reg.retune("ZZ", 1.0).is_err());
        assert!(reg.is_on("ZZ").is_err());
    }

    #[test]
    fn enable_schedules_half_second_ramp() {
        let mut reg = registry();
        reg.sink_mut().clear();
        reg.set_entity_enabled("CA", true).unwrap();
        assert_eq!(
            reg.sink().calls,
            vec![SinkCall::Gain {
                id: "CA".into(),
                target: 0.1,
                ramp: Duration::from_millis(500),
            }]
        );
        assert_eq!(reg.count_enabled(), 2);
    }

    #[test]
    fn update_frequencies_reaches_muted_tones() {
        let mut reg = registry();
        let next = Record::new("2", "2000")
            .with_price("US", 4.4)
            .with_price("CA", 0.4)
            .with_price("NV", 3.0);
        reg.update_frequencies(&next);
        assert!((reg.get("US").unwrap().frequency_hz - 1000.0).abs() < 1e-3);
        assert!((reg.sink().last_frequency("CA").unwrap() - 100.0).abs() < 1e-3);
        // TX absent from the record keeps its pitch; NV has no tone
        assert!((reg.get("TX").unwrap().frequency_hz - 100.0).abs() < 1e-3);
        assert!(reg.get("NV").is_none());
    }

    #[test]
    fn update_frequencies_glides_over_quarter_second() {
        let mut reg = registry();
        reg.sink_mut().clear();
        let next = Record::new("2", "2000").with_price("US", 4.4).with_price("CA", 0.4);
        reg.update_frequencies(&next);
        assert_eq!(
            reg.sink().calls,
            vec![
                SinkCall::Frequency {
                    id: "US".into(),
                    target_hz: 1000.0,
                    ramp: Duration::from_millis(250),
                },
                SinkCall::Frequency {
                    id: "CA".into(),
                    target_hz: 100.0,
                    ramp: Duration::from_millis(250),
                },
            ]
        );
    }

    #[test]
    fn mute_fades_master_out_over_quarter_second() {
        let mut reg = registry();
        reg.unmute_all(&first());
        reg.sink_mut().clear();
        reg.mute_all();
        assert_eq!(
            reg.sink().calls,
            vec![SinkCall::Master {
                target: 0.0,
                ramp: Duration::from_millis(250),
            }]
        );
    }

    #[test]
    fn repeated_entity_gets_one_tone() {
        let rec = Record::new("1", "2000").with_price("US", 2.0).with_price("US", 3.0);
        let mut reg =
            ToneRegistry::initialize(RecordingSink::new(), &rec, &EngineConfig::default()).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.count_enabled(), 1);
        assert!(!reg.toggle("US").unwrap());
        assert_eq!(reg.count_enabled(), 0);
        let created = reg
            .sink()
            .calls
            .iter()
            .filter(|c| matches!(c, SinkCall::CreateTone { .. }))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn unmute_snaps_enabled_pitches_then_fades_master_in() {
        let mut reg = registry();
        reg.sink_mut().clear();
        let rec = Record::new("5", "2001").with_price("US", 4.4).with_price("CA", 4.4);
        reg.unmute_all(&rec);
        assert_eq!(
            reg.sink().calls,
            vec![
                SinkCall::Frequency {
                    id: "US".into(),
                    target_hz: 1000.0,
                    ramp: Duration::ZERO,
                },
                SinkCall::Master {
                    target: 1.0,
                    ramp: Duration::from_millis(250),
                },
            ]
        );
        reg.mute_all();
        assert_eq!(reg.sink().last_master(), Some(0.0));
        assert_eq!(reg.master_gain(), 0.0);
    }
}
