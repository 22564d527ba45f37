use serde::{Deserialize, Serialize};

/// Highest value the three digit timer display can show.
pub const MAX_ELAPSED_SECS: u16 = 999;

/// Identifies one run of the clock. Ticks carry the epoch they were scheduled under and are dropped once the clock
/// has been stopped or restarted since.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickEpoch(u32);

/// Elapsed-seconds counter driven by externally scheduled one second ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    elapsed: u16,
    epoch: TickEpoch,
    running: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn epoch(&self) -> TickEpoch {
        self.epoch
    }

    /// Starts a new run, invalidating every tick scheduled before.
    pub fn start(&mut self) -> TickEpoch {
        self.advance_epoch();
        self.running = true;
        self.epoch
    }

    /// Returns whether the clock was running. Stopping a stopped clock does nothing.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.advance_epoch();
        true
    }

    pub fn reset(&mut self) -> bool {
        let was_running = self.stop();
        self.elapsed = 0;
        was_running
    }

    /// Applies one tick, returning the new elapsed value. Stale ticks and ticks once the display ceiling is reached
    /// return `None`.
    pub fn tick(&mut self, epoch: TickEpoch) -> Option<u16> {
        if !self.running || epoch != self.epoch {
            log::trace!("Dropped tick for {:?}, current {:?}", epoch, self.epoch);
            return None;
        }
        if self.elapsed >= MAX_ELAPSED_SECS {
            return None;
        }
        self.elapsed += 1;
        Some(self.elapsed)
    }

    fn advance_epoch(&mut self) {
        self.epoch = TickEpoch(self.epoch.0.wrapping_add(1));
    }
}
