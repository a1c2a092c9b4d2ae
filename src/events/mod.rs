pub mod keyboard;
pub mod pointer;

use crate::WebEngine;
use std::cell::RefCell;
use std::rc::Rc;
use tones_core::{Command, EngineError};

pub use keyboard::wire_global_keydown;
pub use pointer::{wire_controls, wire_map_clicks};

/// Runs one command to completion. Browser events never interleave, so a
/// failed borrow means a handler re-entered the engine, which is logged.
pub fn dispatch(engine: &Rc<RefCell<WebEngine>>, command: Command) {
    let Ok(mut eng) = engine.try_borrow_mut() else {
        log::error!("[events] engine busy, dropped {:?}", command);
        return;
    };
    match eng.dispatch(command) {
        Ok(()) => {}
        Err(EngineError::UnknownEntity(id)) => log::error!("[events] no tone for region `{}`", id),
        Err(e) => log::error!("[events] {}", e),
    }
}
