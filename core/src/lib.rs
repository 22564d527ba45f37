#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cells::*;
pub use clock::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use observer::*;
pub use session::*;
pub use types::*;

mod cells;
mod clock;
mod config;
mod engine;
mod error;
mod generator;
mod grid;
mod observer;
mod session;
mod types;

/// Where the mines are, plus the adjacent mine count of every cell. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    grid: Grid,
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// `mine_mask` must be shaped like `grid`.
    pub(crate) fn from_mine_mask(grid: Grid, mine_mask: Array2<bool>) -> Self {
        let mut adjacent: Array2<u8> = Array2::default(grid.size().to_nd_index());
        let mut mine_count = 0;

        for coords in grid.iter_coords() {
            if mine_mask[coords.to_nd_index()] {
                mine_count += 1;
                for pos in grid.neighbors(coords) {
                    adjacent[pos.to_nd_index()] += 1;
                }
            }
        }

        Self {
            grid,
            mine_mask,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let grid = Grid::new(size)?;
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            mine_mask[grid.validate_coords(coords)?.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(grid, mine_mask))
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.grid.total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the neighbors of `coords`, meaningless for a mine cell itself.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.grid.iter_coords().filter(|&coords| self[coords])
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    /// Whether the game goes on after this outcome.
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::NoChange | Self::Revealed)
    }

    pub const fn game_outcome(self) -> Option<GameOutcome> {
        match self {
            Self::HitMine => Some(GameOutcome::Lost),
            Self::Won => Some(GameOutcome::Won),
            Self::NoChange | Self::Revealed => None,
        }
    }
}
