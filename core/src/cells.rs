use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Canonical player-visible state stored by the gameplay engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    /// Question mark, only reachable with [`FlagPolicy::TriState`].
    Guessed,
    Flagged,
    Revealed(u8),
    /// A mine that was revealed, ending the game.
    Exploded,
}

impl EngineCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Guessed | Self::Flagged)
    }

    /// Only flags protect a cell from being revealed.
    pub const fn is_revealable(self) -> bool {
        matches!(self, Self::Hidden | Self::Guessed)
    }

    pub const fn mark(self) -> Mark {
        match self {
            Self::Flagged => Mark::Flag,
            Self::Guessed => Mark::Guess,
            _ => Mark::None,
        }
    }
}

/// Player marker on an unrevealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    None,
    Flag,
    Guess,
}

/// Per-cell revealed/flagged state plus incrementally maintained counters.
///
/// Methods taking coordinates expect them to be inside the grid, callers validate first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellStore {
    grid: Grid,
    flag_policy: FlagPolicy,
    cells: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flag_count: Saturating<CellCount>,
}

impl CellStore {
    pub fn new(grid: Grid, flag_policy: FlagPolicy) -> Self {
        Self {
            grid,
            flag_policy,
            cells: Array2::default(grid.size().to_nd_index()),
            revealed_count: Saturating(0),
            flag_count: Saturating(0),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn flag_policy(&self) -> FlagPolicy {
        self.flag_policy
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.cells[coords.to_nd_index()]
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        matches!(
            self.cell_at(coords),
            EngineCell::Revealed(_) | EngineCell::Exploded
        )
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.cell_at(coords) == EngineCell::Flagged
    }

    pub fn is_guessed(&self, coords: Coord2) -> bool {
        self.cell_at(coords) == EngineCell::Guessed
    }

    /// Count shown on a revealed safe cell, `None` for anything else.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Option<u8> {
        match self.cell_at(coords) {
            EngineCell::Revealed(count) => Some(count),
            _ => None,
        }
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count.0
    }

    /// Opens a safe cell. Returns `false` without touching anything if the cell is flagged or already revealed.
    pub fn reveal(&mut self, coords: Coord2, adjacent_mines: u8) -> bool {
        self.open(coords, EngineCell::Revealed(adjacent_mines))
    }

    /// Opens a mine cell, same rules as [`CellStore::reveal`].
    pub fn reveal_mine(&mut self, coords: Coord2) -> bool {
        self.open(coords, EngineCell::Exploded)
    }

    fn open(&mut self, coords: Coord2, opened: EngineCell) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if !cell.is_revealable() {
            return false;
        }
        *cell = opened;
        self.revealed_count += 1;
        true
    }

    /// Cycles the marker of an unrevealed cell according to the flag policy. Revealed cells are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use EngineCell::*;
        use MarkOutcome::*;

        let cell = self.cells[coords.to_nd_index()];
        let next = match (cell, self.flag_policy) {
            (Hidden, _) => Flagged,
            (Flagged, FlagPolicy::Binary) => Hidden,
            (Flagged, FlagPolicy::TriState) => Guessed,
            (Guessed, _) => Hidden,
            (Revealed(_) | Exploded, _) => return NoChange,
        };

        match (cell, next) {
            (_, Flagged) => self.flag_count += 1,
            (Flagged, _) => self.flag_count -= 1,
            _ => {}
        }
        self.cells[coords.to_nd_index()] = next;
        Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(policy: FlagPolicy) -> CellStore {
        CellStore::new(Grid::new((3, 3)).unwrap(), policy)
    }

    #[test]
    fn reveal_counts_once() {
        let mut cells = store(FlagPolicy::Binary);

        assert!(cells.reveal((1, 1), 2));
        assert!(!cells.reveal((1, 1), 2));

        assert_eq!(cells.revealed_count(), 1);
        assert_eq!(cells.adjacent_mine_count((1, 1)), Some(2));
        assert!(cells.is_revealed((1, 1)));
    }

    #[test]
    fn flagged_cell_is_inert_to_reveal() {
        let mut cells = store(FlagPolicy::Binary);

        assert_eq!(cells.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert!(!cells.reveal((0, 0), 0));
        assert!(!cells.reveal_mine((0, 0)));

        assert!(cells.is_flagged((0, 0)));
        assert!(!cells.is_revealed((0, 0)));
        assert_eq!(cells.revealed_count(), 0);
    }

    #[test]
    fn binary_flag_round_trip_restores_state() {
        let mut cells = store(FlagPolicy::Binary);

        cells.toggle_flag((2, 1));
        assert_eq!(cells.flag_count(), 1);
        cells.toggle_flag((2, 1));

        assert_eq!(cells.cell_at((2, 1)), EngineCell::Hidden);
        assert_eq!(cells.flag_count(), 0);
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut cells = store(FlagPolicy::Binary);
        cells.reveal((0, 0), 1);

        assert_eq!(cells.toggle_flag((0, 0)), MarkOutcome::NoChange);
        assert_eq!(cells.flag_count(), 0);
        assert_eq!(cells.cell_at((0, 0)), EngineCell::Revealed(1));
    }

    #[test]
    fn tri_state_cycles_through_guess() {
        let mut cells = store(FlagPolicy::TriState);

        cells.toggle_flag((1, 0));
        assert_eq!(cells.cell_at((1, 0)).mark(), Mark::Flag);
        assert_eq!(cells.flag_count(), 1);

        cells.toggle_flag((1, 0));
        assert_eq!(cells.cell_at((1, 0)).mark(), Mark::Guess);
        assert_eq!(cells.flag_count(), 0);

        cells.toggle_flag((1, 0));
        assert_eq!(cells.cell_at((1, 0)), EngineCell::Hidden);
        assert_eq!(cells.flag_count(), 0);
    }

    #[test]
    fn guessed_cell_can_be_revealed() {
        let mut cells = store(FlagPolicy::TriState);
        cells.toggle_flag((1, 2));
        cells.toggle_flag((1, 2));
        assert!(cells.is_guessed((1, 2)));

        assert!(cells.reveal((1, 2), 3));
        assert_eq!(cells.cell_at((1, 2)), EngineCell::Revealed(3));
    }

    #[test]
    fn exploded_mine_counts_as_revealed() {
        let mut cells = store(FlagPolicy::Binary);

        assert!(cells.reveal_mine((2, 2)));

        assert!(cells.is_revealed((2, 2)));
        assert_eq!(cells.adjacent_mine_count((2, 2)), None);
        assert_eq!(cells.revealed_count(), 1);
    }
}
