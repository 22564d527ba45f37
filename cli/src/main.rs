use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use std::io;
use sweeper_core::{CellCount, Coord2, Difficulty, FlagPolicy, GameConfig, GameSession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use app::{App, Event, Flow};
use command::DifficultyArg;

mod app;
mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Beginner)]
    difficulty: DifficultyArg,

    /// Custom board size as WIDTHxHEIGHT, overrides the preset
    #[arg(long, value_parser = parse_size, requires = "mines")]
    size: Option<Coord2>,

    /// Mine count for a custom board
    #[arg(long, requires = "size")]
    mines: Option<CellCount>,

    /// Cycle flags through a question mark before clearing them
    #[arg(long)]
    question_marks: bool,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print game events as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let config = match (self.size, self.mines) {
            (Some(size), Some(mines)) => {
                GameConfig::new(size, mines).context("invalid custom board")?
            }
            _ => Difficulty::from(self.difficulty).config(),
        };
        let flag_policy = if self.question_marks {
            FlagPolicy::TriState
        } else {
            FlagPolicy::Binary
        };
        Ok(config.with_flag_policy(flag_policy))
    }
}

fn parse_size(value: &str) -> Result<Coord2, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width = width.trim().parse().map_err(|err| format!("width: {err}"))?;
    let height = height.trim().parse().map_err(|err| format!("height: {err}"))?;
    Ok((width, height))
}

fn init_logging(level: log::LevelFilter) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Forwards every line of `reader` to the event loop, then reports that input is exhausted.
async fn forward_input<R>(reader: R, sender: UnboundedSender<Event>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if sender.send(Event::Input(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                log::error!("Failed to read input: {err}");
                break;
            }
        }
    }
    let _ = sender.send(Event::InputClosed);
}

async fn run(args: Args) -> Result<()> {
    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("seed: {seed}, board: {:?}", config);
    let session = GameSession::new(config, seed).context("invalid board configuration")?;

    let (sender, mut receiver) = mpsc::unbounded_channel();
    tokio::spawn(forward_input(
        BufReader::new(tokio::io::stdin()),
        sender.clone(),
    ));

    let mut app = App::new(session, args.json, sender, io::stdout());
    app.start()?;
    while let Some(event) = receiver.recv().await {
        if app.handle(event)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting the runtime")?;
    let result = runtime.block_on(run(args));
    // stdin reads are blocking and would otherwise hold the shutdown until the next line arrives
    runtime.shutdown_background();

    log::debug!("Bye");
    result
}
