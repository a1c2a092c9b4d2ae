use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use tones_core::{AudioSink, Command, Dataset, EngineConfig, EngineError, PlaybackEngine};

mod cli;
mod input;
mod synth;
mod terminal;
mod ticker;

use synth::{CpalSink, SilentSink};
use terminal::TerminalRenderer;
use ticker::ThreadTicker;

/// Everything the main loop reacts to; timer and stdin threads only send.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Engine(Command),
    Tick(u64),
    Help,
    Quit,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = cli::Args::parse();
    let config = args.engine_config();
    config.validate()?;

    let text = std::fs::read_to_string(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let dataset = Arc::new(Dataset::from_csv(&text, &config)?);

    if args.no_audio {
        run(SilentSink, dataset, &config, &args)
    } else {
        let sink = CpalSink::open().context("opening audio output (try --no-audio)")?;
        run(sink, dataset, &config, &args)
    }
}

fn run<S: AudioSink>(
    sink: S,
    dataset: Arc<Dataset>,
    config: &EngineConfig,
    args: &cli::Args,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let styled = !args.plain && std::io::stdout().is_terminal();
    let renderer = TerminalRenderer::new(
        std::io::stdout(),
        config.color_mapper()?,
        config.headline_entity.clone(),
        styled,
    );
    let ticker = ThreadTicker::new(tx.clone());
    let mut engine = PlaybackEngine::new(dataset, sink, renderer, ticker, config)?;

    // During autoplay a closed stdin must not cut playback short.
    input::spawn_stdin_reader(tx, !args.autoplay)?;
    println!("{}", input::HELP);
    if args.autoplay {
        engine.play();
    }
    event_loop(&mut engine, &rx, args.autoplay);
    engine.pause();
    Ok(())
}

/// The single serialized context: every engine mutation happens here.
fn event_loop<S: AudioSink, W: std::io::Write>(
    engine: &mut PlaybackEngine<S, TerminalRenderer<W>, ThreadTicker>,
    rx: &Receiver<Event>,
    exit_at_end: bool,
) {
    while let Ok(event) = rx.recv() {
        let command = match event {
            Event::Quit => break,
            Event::Help => {
                println!("{}", input::HELP);
                continue;
            }
            Event::Tick(gen) if !engine.ticker().is_current(gen) => continue,
            Event::Tick(_) => Command::Tick,
            Event::Engine(c) => c,
        };
        let was_tick = command == Command::Tick;
        match engine.dispatch(command) {
            Ok(()) => {}
            Err(EngineError::UnknownEntity(id)) => log::warn!("[input] no tone for `{id}`"),
            Err(e) => log::error!("[engine] {e}"),
        }
        if exit_at_end && was_tick && !engine.is_playing() {
            break;
        }
    }
}
