use tones_core::Command;

/// Engine command bound to a keyboard key, if any.
#[inline]
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        " " | "Spacebar" | "p" | "P" => Some(Command::Play),
        "r" | "R" => Some(Command::Reset),
        "Escape" => Some(Command::Pause),
        _ => None,
    }
}
