// ---------------- Native audio (cpal) ----------------
//
// Software stand-in for the WebAudio graph: one running oscillator per tone,
// each through its own gain, summed into a master gain.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use fnv::FnvHashMap;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tones_core::{AudioSink, SinkError, Waveform};

/// Audio parameter with linear ramps measured in samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    value: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl Param {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Ramp from the current value; a zero-length ramp jumps.
    pub fn ramp_to(&mut self, target: f32, ramp: Duration, sample_rate: f32) {
        let n = (ramp.as_secs_f32() * sample_rate).round() as u32;
        self.target = target;
        if n == 0 || !self.value.is_finite() {
            self.value = target;
            self.remaining = 0;
        } else {
            self.step = (target - self.value) / n as f32;
            self.remaining = n;
        }
    }

    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.value = if self.remaining == 0 {
                self.target
            } else {
                self.value + self.step
            };
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

struct Voice {
    waveform: Waveform,
    phase: f32,
    frequency: Param,
    gain: Param,
}

pub fn render_wave_sample(phase: f32, wave: Waveform) -> f32 {
    let saw = || {
        let t = phase / (2.0 * PI);
        2.0 * (t - t.floor()) - 1.0
    };
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => saw(),
        Waveform::Triangle => 2.0 * saw().abs() - 1.0,
    }
}

/// Mixes every voice into one mono sample stream.
pub struct Mixer {
    sample_rate: f32,
    voices: Vec<Voice>,
    index: FnvHashMap<String, usize>,
    master: Param,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            voices: Vec::new(),
            index: FnvHashMap::default(),
            master: Param::new(0.0),
        }
    }

    pub fn add_voice(&mut self, id: &str, waveform: Waveform, frequency_hz: f32, gain: f32) {
        self.index.insert(id.to_string(), self.voices.len());
        self.voices.push(Voice {
            waveform,
            phase: 0.0,
            frequency: Param::new(frequency_hz),
            gain: Param::new(gain),
        });
    }

    fn voice(&mut self, id: &str) -> Option<&mut Voice> {
        let i = *self.index.get(id)?;
        self.voices.get_mut(i)
    }

    pub fn ramp_gain(&mut self, id: &str, target: f32, ramp: Duration) {
        let sr = self.sample_rate;
        match self.voice(id) {
            Some(v) => v.gain.ramp_to(target, ramp, sr),
            None => log::warn!("[audio] gain for unknown voice {}", id),
        }
    }

    pub fn ramp_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration) {
        let sr = self.sample_rate;
        match self.voice(id) {
            Some(v) => v.frequency.ramp_to(target_hz, ramp, sr),
            None => log::warn!("[audio] frequency for unknown voice {}", id),
        }
    }

    pub fn ramp_master(&mut self, target: f32, ramp: Duration) {
        self.master.ramp_to(target, ramp, self.sample_rate);
    }

    pub fn next_sample(&mut self) -> f32 {
        let sr = self.sample_rate;
        let mut sum = 0.0f32;
        for v in &mut self.voices {
            let gain = v.gain.next();
            let hz = v.frequency.next();
            // NaN prices give NaN pitches; such voices stay silent.
            if !hz.is_finite() {
                continue;
            }
            sum += render_wave_sample(v.phase, v.waveform) * gain;
            v.phase += 2.0 * PI * hz / sr;
            if v.phase > 2.0 * PI {
                v.phase -= 2.0 * PI;
            }
        }
        (sum * self.master.next()).tanh()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

pub struct CpalSink {
    mixer: Arc<Mutex<Mixer>>,
    _stream: cpal::Stream,
}

impl CpalSink {
    pub fn open() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no audio output device"))?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));

        let err_fn = |err: cpal::StreamError| log::error!("[audio] stream error: {err}");
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream_f32(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)?
            }
            cpal::SampleFormat::I16 => {
                build_stream_i16(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)?
            }
            cpal::SampleFormat::U16 => {
                build_stream_u16(&device, &config.into(), channels, Arc::clone(&mixer), err_fn)?
            }
            other => anyhow::bail!("unsupported sample format {other:?}"),
        };
        stream.play()?;
        log::info!("[audio] output at {} Hz, {} channels", sample_rate, channels);
        Ok(Self {
            mixer,
            _stream: stream,
        })
    }

    fn with_mixer(&self, f: impl FnOnce(&mut Mixer)) {
        match self.mixer.lock() {
            Ok(mut m) => f(&mut m),
            Err(_) => log::error!("[audio] mixer lock poisoned"),
        }
    }
}

impl AudioSink for CpalSink {
    fn create_tone(
        &mut self,
        id: &str,
        waveform: Waveform,
        frequency_hz: f32,
        gain: f32,
    ) -> Result<(), SinkError> {
        let mut m = self
            .mixer
            .lock()
            .map_err(|_| SinkError("mixer lock poisoned".into()))?;
        m.add_voice(id, waveform, frequency_hz, gain);
        Ok(())
    }

    fn set_gain(&mut self, id: &str, target: f32, ramp: Duration) {
        self.with_mixer(|m| m.ramp_gain(id, target, ramp));
    }

    fn set_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration) {
        self.with_mixer(|m| m.ramp_frequency(id, target_hz, ramp));
    }

    fn set_master_gain(&mut self, target: f32, ramp: Duration) {
        self.with_mixer(|m| m.ramp_master(target, ramp));
    }
}

/// Sink for `--no-audio` runs: nothing is played, ramps are traced.
#[derive(Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn create_tone(&mut self, id: &str, _: Waveform, frequency_hz: f32, gain: f32) -> Result<(), SinkError> {
        log::trace!("[audio] tone {} {:.1}Hz gain {}", id, frequency_hz, gain);
        Ok(())
    }

    fn set_gain(&mut self, id: &str, target: f32, ramp: Duration) {
        log::trace!("[audio] gain {} -> {} over {:?}", id, target, ramp);
    }

    fn set_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration) {
        log::trace!("[audio] freq {} -> {:.1}Hz over {:?}", id, target_hz, ramp);
    }

    fn set_master_gain(&mut self, target: f32, ramp: Duration) {
        log::trace!("[audio] master -> {} over {:?}", target, ramp);
    }
}

fn fill<T: Copy>(data: &mut [T], channels: usize, mixer: &Mutex<Mixer>, silence: T, convert: impl Fn(f32) -> T) {
    let Ok(mut m) = mixer.lock() else {
        data.fill(silence);
        return;
    };
    for frame in data.chunks_mut(channels.max(1)) {
        let v = convert(m.next_sample());
        frame.fill(v);
    }
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: Arc<Mutex<Mixer>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [f32], _| fill(data, channels, &mixer, 0.0, |s| s),
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: Arc<Mutex<Mixer>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [i16], _| fill(data, channels, &mixer, 0, |s| (s * i16::MAX as f32) as i16),
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mixer: Arc<Mutex<Mixer>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [u16], _| {
            fill(data, channels, &mixer, u16::MAX / 2, |s| {
                ((s * 0.5 + 0.5).clamp(0.0, 1.0) * u16::MAX as f32) as u16
            })
        },
        err_fn,
        None,
    )
}
