use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use sweeper_core::{Difficulty, GameEvent, GameOutcome, GameSession, TickEpoch};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::command::Command;
use crate::render::render_board;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum Event {
    Input(String),
    Tick(TickEpoch),
    InputClosed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Sends `Tick(epoch)` once per period until aborted, starting one period from now.
async fn run_ticker(epoch: TickEpoch, sender: UnboundedSender<Event>) {
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        interval.tick().await;
        if sender.send(Event::Tick(epoch)).is_err() {
            break;
        }
    }
}

/// Terminal front-end around one [`GameSession`]. Owns the ticker task while a game is running.
///
/// Must be driven from inside a tokio runtime since starting a game spawns the ticker.
pub struct App<W: Write> {
    session: GameSession,
    json: bool,
    sender: UnboundedSender<Event>,
    ticker: Option<JoinHandle<()>>,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(session: GameSession, json: bool, sender: UnboundedSender<Event>, out: W) -> Self {
        Self {
            session,
            json,
            sender,
            ticker: None,
            out,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn start(&mut self) -> Result<()> {
        if self.json {
            let initial = [
                GameEvent::Restarted {
                    config: self.session.config(),
                },
                GameEvent::RemainingMinesChanged {
                    remaining: self.session.remaining_mines(),
                },
            ];
            self.publish(&initial)
        } else {
            self.draw()?;
            self.out.flush().context("flushing output")
        }
    }

    pub fn handle(&mut self, event: Event) -> Result<Flow> {
        let mut events: Vec<GameEvent> = Vec::new();

        let flow = match event {
            Event::Input(line) => self.handle_line(line.trim(), &mut events)?,
            Event::Tick(epoch) => {
                self.session.tick(epoch, &mut events);
                Flow::Continue
            }
            Event::InputClosed => Flow::Quit,
        };

        self.sync_ticker(&events);
        self.publish(&events)?;
        Ok(flow)
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<GameEvent>) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match Command::parse_line(line) {
            Ok(command) => command,
            Err(err) => {
                write!(self.out, "{err}").context("writing usage")?;
                return Ok(Flow::Continue);
            }
        };
        log::debug!("Command: {:?}", command);

        let result = match command {
            Command::Reveal { x, y } => self.session.reveal((x, y), events).map(drop),
            Command::Flag { x, y } => self.session.toggle_flag((x, y), events).map(drop),
            Command::Restart => {
                self.session.restart(events);
                Ok(())
            }
            Command::Preset { level } => {
                let config = Difficulty::from(level)
                    .config()
                    .with_flag_policy(self.session.config().flag_policy);
                self.session.reconfigure(config, events)
            }
            Command::Print => Ok(()),
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(err) = result {
            log::warn!("Rejected {:?}: {}", line, err);
            writeln!(self.out, "error: {err}").context("writing error")?;
        }
        if !self.json {
            self.draw()?;
        }
        Ok(Flow::Continue)
    }

    fn sync_ticker(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ClockStarted { epoch } => {
                    self.stop_ticker();
                    log::trace!("Ticker started for {:?}", epoch);
                    self.ticker = Some(tokio::spawn(run_ticker(epoch, self.sender.clone())));
                }
                GameEvent::ClockStopped => self.stop_ticker(),
                _ => {}
            }
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn publish(&mut self, events: &[GameEvent]) -> Result<()> {
        for event in events {
            if self.json {
                serde_json::to_writer(&mut self.out, event).context("writing event")?;
                writeln!(self.out).context("writing event")?;
            } else if let GameEvent::GameEnded { outcome } = *event {
                let message = match outcome {
                    GameOutcome::Won => "You cleared the board!",
                    GameOutcome::Lost => "Boom! Game over.",
                };
                writeln!(
                    self.out,
                    "{message} Time: {}s. Type `restart` for another round.",
                    self.session.elapsed_secs()
                )
                .context("writing result")?;
            }
        }
        self.out.flush().context("flushing output")
    }

    fn draw(&mut self) -> Result<()> {
        let board = render_board(&self.session)?;
        write!(self.out, "{board}").context("drawing board")
    }
}

impl<W: Write> Drop for App<W> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
