// Host-side tests for pure keyboard functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keys {
    include!("../src/keys.rs");
}

use keys::command_for_key;
use tones_core::Command;

#[test]
fn space_and_p_toggle_playback() {
    assert_eq!(command_for_key(" "), Some(Command::Play));
    assert_eq!(command_for_key("p"), Some(Command::Play));
    assert_eq!(command_for_key("P"), Some(Command::Play));
}

#[test]
fn r_resets_either_case() {
    assert_eq!(command_for_key("r"), Some(Command::Reset));
    assert_eq!(command_for_key("R"), Some(Command::Reset));
}

#[test]
fn escape_pauses() {
    assert_eq!(command_for_key("Escape"), Some(Command::Pause));
}

#[test]
fn other_keys_are_ignored() {
    for k in ["a", "Enter", "ArrowLeft", "1", ""] {
        assert_eq!(command_for_key(k), None, "key {k:?}");
    }
}
