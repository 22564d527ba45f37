use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a view should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Guessed,
    Flagged,
    Revealed(u8),
    /// The mine that ended the game.
    TriggeredMine,
    /// Unflagged mine shown after a loss.
    Mine,
    /// Flag on a safe cell, shown once the game is over.
    Misflagged,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Notifications emitted by [`GameSession`] for the rendering layer. Every method defaults to doing nothing.
pub trait GameObserver {
    fn on_cell_revealed(&mut self, _coords: Coord2, _view: CellView) {}

    fn on_cell_flagged(&mut self, _coords: Coord2, _mark: Mark) {}

    fn on_remaining_mines_changed(&mut self, _remaining: i32) {}

    fn on_tick(&mut self, _elapsed_secs: u16) {}

    fn on_game_ended(&mut self, _outcome: GameOutcome) {}

    /// Ticks for `epoch` should be scheduled once per second from now on.
    fn on_clock_started(&mut self, _epoch: TickEpoch) {}

    /// Scheduled ticks can be cancelled, any that still arrive are ignored.
    fn on_clock_stopped(&mut self) {}

    fn on_restarted(&mut self, _config: GameConfig) {}
}

impl GameObserver for () {}

/// Recorded form of a [`GameObserver`] notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    CellRevealed { coords: Coord2, view: CellView },
    CellFlagged { coords: Coord2, mark: Mark },
    RemainingMinesChanged { remaining: i32 },
    Tick { elapsed_secs: u16 },
    GameEnded { outcome: GameOutcome },
    ClockStarted { epoch: TickEpoch },
    ClockStopped,
    Restarted { config: GameConfig },
}

impl GameObserver for Vec<GameEvent> {
    fn on_cell_revealed(&mut self, coords: Coord2, view: CellView) {
        self.push(GameEvent::CellRevealed { coords, view });
    }

    fn on_cell_flagged(&mut self, coords: Coord2, mark: Mark) {
        self.push(GameEvent::CellFlagged { coords, mark });
    }

    fn on_remaining_mines_changed(&mut self, remaining: i32) {
        self.push(GameEvent::RemainingMinesChanged { remaining });
    }

    fn on_tick(&mut self, elapsed_secs: u16) {
        self.push(GameEvent::Tick { elapsed_secs });
    }

    fn on_game_ended(&mut self, outcome: GameOutcome) {
        self.push(GameEvent::GameEnded { outcome });
    }

    fn on_clock_started(&mut self, epoch: TickEpoch) {
        self.push(GameEvent::ClockStarted { epoch });
    }

    fn on_clock_stopped(&mut self) {
        self.push(GameEvent::ClockStopped);
    }

    fn on_restarted(&mut self, config: GameConfig) {
        self.push(GameEvent::Restarted { config });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_notification_order() {
        let mut events: Vec<GameEvent> = Vec::new();

        events.on_clock_started(TickEpoch::default());
        events.on_cell_flagged((1, 2), Mark::Flag);
        events.on_remaining_mines_changed(9);
        events.on_tick(1);
        events.on_game_ended(GameOutcome::Lost);

        assert_eq!(events.len(), 5);
        assert_eq!(
            events[1],
            GameEvent::CellFlagged {
                coords: (1, 2),
                mark: Mark::Flag
            }
        );
        assert_eq!(
            events[4],
            GameEvent::GameEnded {
                outcome: GameOutcome::Lost
            }
        );
    }

    #[test]
    fn events_serialize_with_a_tag() {
        let revealed = GameEvent::CellRevealed {
            coords: (2, 3),
            view: CellView::Revealed(1),
        };
        assert_eq!(
            serde_json::to_string(&revealed).unwrap(),
            r#"{"event":"cell_revealed","coords":[2,3],"view":{"Revealed":1}}"#
        );
        assert_eq!(
            serde_json::to_string(&GameEvent::ClockStopped).unwrap(),
            r#"{"event":"clock_stopped"}"#
        );
    }
}
