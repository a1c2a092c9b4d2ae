//! Playback engine: frame cursor, play/pause state and the tick loop.
//!
//! All state changes go through one `&mut self` at a time. Front-ends feed
//! timer ticks and user input into [`PlaybackEngine::dispatch`] from a single
//! context (the browser event loop, or one thread draining a channel).

use crate::audio::AudioSink;
use crate::config::EngineConfig;
use crate::dataset::{Dataset, Record};
use crate::error::EngineError;
use crate::tones::{ToneLookup, ToneRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Recurring timer that delivers [`Command::Tick`] while playing.
pub trait Ticker {
    fn start(&mut self, interval: Duration);
    fn stop(&mut self);
}

/// Paints one frame: readouts for the date fields and a shaded color per entity.
pub trait Renderer {
    fn render(&mut self, index: usize, record: &Record, tones: &dyn ToneLookup);

    /// Called whenever playback starts or stops (e.g. to relabel a button).
    fn playback_changed(&mut self, _playing: bool) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Reset,
    Tick,
    Toggle(String),
}

pub struct PlaybackEngine<S: AudioSink, R: Renderer, T: Ticker> {
    dataset: Arc<Dataset>,
    tones: ToneRegistry<S>,
    renderer: R,
    ticker: T,
    tick_interval: Duration,
    cursor: usize,
    playing: bool,
}

impl<S: AudioSink, R: Renderer, T: Ticker> PlaybackEngine<S, R, T> {
    pub fn new(
        dataset: Arc<Dataset>,
        sink: S,
        renderer: R,
        ticker: T,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let first = dataset.first().ok_or(EngineError::DataUnavailable)?;
        let tones = ToneRegistry::initialize(sink, first, config)?;
        let mut engine = Self {
            dataset,
            tones,
            renderer,
            ticker,
            tick_interval: config.tick_interval,
            cursor: 0,
            playing: false,
        };
        engine.render_current();
        log::info!(
            "[engine] ready: frames={} tones={} interval={:?}",
            engine.dataset.len(),
            engine.tones.len(),
            engine.tick_interval
        );
        Ok(engine)
    }

    pub fn dispatch(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Tick => self.tick(),
            Command::Toggle(id) => {
                self.on_toggle(&id)?;
            }
        }
        Ok(())
    }

    /// Starts playback, or pauses if already playing. Playing from the last
    /// frame starts over from frame 0.
    pub fn play(&mut self) {
        if self.playing {
            self.pause();
            return;
        }
        if self.cursor + 1 >= self.dataset.len() {
            self.cursor = 0;
            self.refresh();
        }
        self.playing = true;
        self.renderer.playback_changed(true);
        let dataset = Arc::clone(&self.dataset);
        if let Some(record) = dataset.get(self.cursor) {
            self.tones.unmute_all(record);
        }
        self.ticker.start(self.tick_interval);
        log::info!("[engine] play from frame {}", self.cursor);
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.ticker.stop();
        self.tones.mute_all();
        self.playing = false;
        self.renderer.playback_changed(false);
        log::info!("[engine] paused at frame {}", self.cursor);
    }

    pub fn reset(&mut self) {
        self.pause();
        self.cursor = 0;
        self.refresh();
    }

    /// Shows the frame under the cursor, then advances. Running off the end
    /// steps the cursor back two frames and pauses.
    pub fn tick(&mut self) {
        if !self.playing {
            log::debug!("[engine] stale tick ignored");
            return;
        }
        if self.cursor >= self.dataset.len() {
            self.stop_at_end();
            return;
        }
        self.refresh();
        self.cursor += 1;
        if self.cursor >= self.dataset.len() {
            self.stop_at_end();
        }
    }

    fn stop_at_end(&mut self) {
        self.cursor = self.cursor.saturating_sub(2);
        log::info!("[engine] reached end of data");
        self.pause();
    }

    pub fn on_toggle(&mut self, id: &str) -> Result<bool, EngineError> {
        let enabled = self.tones.toggle(id)?;
        self.render_current();
        Ok(enabled)
    }

    fn render_current(&mut self) {
        let dataset = Arc::clone(&self.dataset);
        if let Some(record) = dataset.get(self.cursor) {
            self.renderer.render(self.cursor, record, &self.tones);
        }
    }

    fn refresh(&mut self) {
        let dataset = Arc::clone(&self.dataset);
        if let Some(record) = dataset.get(self.cursor) {
            self.renderer.render(self.cursor, record, &self.tones);
            self.tones.update_frequencies(record);
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_record(&self) -> Option<&Record> {
        self.dataset.get(self.cursor)
    }

    pub fn tones(&self) -> &ToneRegistry<S> {
        &self.tones
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }
}
