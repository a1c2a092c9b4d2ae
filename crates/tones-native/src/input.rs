use crate::Event;
use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread;
use tones_core::Command;

pub const HELP: &str =
    "keys: p = play/pause, s = pause, r = reset, <ID> = toggle entity (e.g. CA), q = quit";

/// Maps one line typed on stdin to an event. Anything that is not a control
/// word is treated as an entity id.
pub fn parse_line(line: &str) -> Option<Event> {
    let word = line.trim();
    match word {
        "" => None,
        "p" | "P" | "play" => Some(Event::Engine(Command::Play)),
        "s" | "S" | "pause" => Some(Event::Engine(Command::Pause)),
        "r" | "R" | "reset" => Some(Event::Engine(Command::Reset)),
        "q" | "Q" | "quit" | "exit" => Some(Event::Quit),
        "h" | "H" | "?" | "help" => Some(Event::Help),
        id => Some(Event::Engine(Command::Toggle(id.to_ascii_uppercase()))),
    }
}

/// Forwards parsed lines until the reader ends. With `quit_on_eof` the end
/// of input also ends the session.
pub fn forward_lines<R: BufRead>(reader: R, tx: &Sender<Event>, quit_on_eof: bool) {
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if let Some(ev) = parse_line(&line) {
            if tx.send(ev).is_err() {
                return;
            }
        }
    }
    log::debug!("[input] stdin closed");
    if quit_on_eof {
        _ = tx.send(Event::Quit);
    }
}

/// Reads stdin on its own thread.
pub fn spawn_stdin_reader(
    tx: Sender<Event>,
    quit_on_eof: bool,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || forward_lines(std::io::stdin().lock(), &tx, quit_on_eof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn control_words_map_to_commands() {
        assert_eq!(parse_line("p"), Some(Event::Engine(Command::Play)));
        assert_eq!(parse_line(" reset \n"), Some(Event::Engine(Command::Reset)));
        assert_eq!(parse_line("s"), Some(Event::Engine(Command::Pause)));
        assert_eq!(parse_line("q"), Some(Event::Quit));
        assert_eq!(parse_line("?"), Some(Event::Help));
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn other_words_toggle_uppercased_entities() {
        assert_eq!(
            parse_line("ca"),
            Some(Event::Engine(Command::Toggle("CA".into())))
        );
        assert_eq!(
            parse_line("US"),
            Some(Event::Engine(Command::Toggle("US".into())))
        );
    }

    #[test]
    fn end_of_input_quits_when_asked() {
        let (tx, rx) = mpsc::channel();
        forward_lines(Cursor::new("ca\n\np\n"), &tx, true);
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Event::Engine(Command::Toggle("CA".into())),
                Event::Engine(Command::Play),
                Event::Quit,
            ]
        );
    }

    #[test]
    fn end_of_input_is_silent_during_autoplay() {
        let (tx, rx) = mpsc::channel();
        forward_lines(Cursor::new("r\n"), &tx, false);
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events, vec![Event::Engine(Command::Reset)]);
    }
}
