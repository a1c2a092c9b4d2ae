use crate::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tones_core::Ticker;

/// Sends `Event::Tick(generation)` on a background thread. Each `start`/`stop`
/// bumps the generation, so ticks already queued by an old timer are
/// recognizable and dropped by the main loop.
pub struct ThreadTicker {
    tx: Sender<Event>,
    generation: Arc<AtomicU64>,
}

impl ThreadTicker {
    pub fn new(tx: Sender<Event>) -> Self {
        Self {
            tx,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl Ticker for ThreadTicker {
    fn start(&mut self, interval: Duration) {
        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let live = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("playback-ticker".into())
            .spawn(move || loop {
                thread::sleep(interval);
                if live.load(Ordering::SeqCst) != gen || tx.send(Event::Tick(gen)).is_err() {
                    break;
                }
            });
        if let Err(e) = spawned {
            log::error!("[ticker] spawn failed: {e}");
        }
    }

    fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn delivers_ticks_until_stopped() {
        let (tx, rx) = mpsc::channel();
        let mut t = ThreadTicker::new(tx);
        t.start(Duration::from_millis(5));
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let Event::Tick(gen) = first else {
            panic!("expected tick, got {first:?}");
        };
        assert!(t.is_current(gen));
        t.stop();
        assert!(!t.is_current(gen));
    }
}
