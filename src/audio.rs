use fnv::FnvHashMap;
use std::time::Duration;
use tones_core::{AudioSink, SinkError, Waveform};
use web_sys as web;

struct ToneNodes {
    oscillator: web::OscillatorNode,
    gain: web::GainNode,
}

/// WebAudio graph: oscillator -> gain per entity, all into one master gain.
pub struct WebAudioSink {
    audio_ctx: web::AudioContext,
    master_gain: web::GainNode,
    tones: FnvHashMap<String, ToneNodes>,
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, SinkError> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(SinkError(format!("{label} GainNode: {e:?}")))
        }
    }
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

/// Linear ramp from the parameter's present value, or an immediate set for a
/// zero-length ramp. AudioParam rejects non-finite values, so those are dropped.
fn ramp_param(audio_ctx: &web::AudioContext, param: &web::AudioParam, target: f32, ramp: Duration) {
    if !target.is_finite() {
        log::debug!("[audio] skipping non-finite target");
        return;
    }
    let now = audio_ctx.current_time();
    _ = param.cancel_scheduled_values(now);
    if ramp.is_zero() {
        _ = param.set_value_at_time(target, now);
        return;
    }
    _ = param.set_value_at_time(param.value(), now);
    _ = param.linear_ramp_to_value_at_time(target, now + ramp.as_secs_f64());
}

impl WebAudioSink {
    pub fn new(audio_ctx: web::AudioContext) -> Result<Self, SinkError> {
        let master_gain = create_gain(&audio_ctx, 0.0, "Master")?;
        master_gain
            .connect_with_audio_node(&audio_ctx.destination())
            .map_err(|e| SinkError(format!("master connect: {e:?}")))?;
        Ok(Self {
            audio_ctx,
            master_gain,
            tones: FnvHashMap::default(),
        })
    }

    fn tone(&self, id: &str) -> Option<&ToneNodes> {
        let t = self.tones.get(id);
        if t.is_none() {
            log::warn!("[audio] no nodes for {}", id);
        }
        t
    }
}

impl AudioSink for WebAudioSink {
    fn create_tone(
        &mut self,
        id: &str,
        waveform: Waveform,
        frequency_hz: f32,
        gain: f32,
    ) -> Result<(), SinkError> {
        let oscillator = web::OscillatorNode::new(&self.audio_ctx)
            .map_err(|e| SinkError(format!("OscillatorNode {id}: {e:?}")))?;
        oscillator.set_type(oscillator_type(waveform));
        if frequency_hz.is_finite() {
            oscillator.frequency().set_value(frequency_hz);
        }
        let gain_node = create_gain(&self.audio_ctx, gain, id)?;
        oscillator
            .connect_with_audio_node(&gain_node)
            .and_then(|_| gain_node.connect_with_audio_node(&self.master_gain))
            .map_err(|e| SinkError(format!("connect {id}: {e:?}")))?;
        oscillator
            .start()
            .map_err(|e| SinkError(format!("start {id}: {e:?}")))?;
        self.tones.insert(
            id.to_string(),
            ToneNodes {
                oscillator,
                gain: gain_node,
            },
        );
        Ok(())
    }

    fn set_gain(&mut self, id: &str, target: f32, ramp: Duration) {
        if let Some(t) = self.tone(id) {
            ramp_param(&self.audio_ctx, &t.gain.gain(), target, ramp);
        }
    }

    fn set_frequency(&mut self, id: &str, target_hz: f32, ramp: Duration) {
        if let Some(t) = self.tone(id) {
            ramp_param(&self.audio_ctx, &t.oscillator.frequency(), target_hz, ramp);
        }
    }

    fn set_master_gain(&mut self, target: f32, ramp: Duration) {
        ramp_param(&self.audio_ctx, &self.master_gain.gain(), target, ramp);
    }
}
