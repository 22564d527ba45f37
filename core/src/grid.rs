use serde::{Deserialize, Serialize};

use crate::*;

/// Static board topology: dimensions and the 8-neighborhood of every cell.
///
/// A `Grid` carries no mutable state, so it is `Copy` and can be handed to any number of sessions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: Coord2,
}

impl Grid {
    pub const fn new_unchecked(size: Coord2) -> Self {
        Self { size }
    }

    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration(
                "board dimensions must be positive",
            ));
        }
        Ok(Self::new_unchecked(size))
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange(coords))
        }
    }

    /// Neighbors of an in-bounds cell, never including the cell itself.
    pub fn neighbors_of(&self, coords: Coord2) -> Result<NeighborIter> {
        let coords = self.validate_coords(coords)?;
        Ok(self.neighbors(coords))
    }

    /// Same as [`Grid::neighbors_of`] for coordinates already known to be in bounds.
    pub(crate) fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter {
            grid: *self,
            center: coords,
            offsets: NEIGHBOR_OFFSETS.iter(),
        }
    }

    /// Every cell of the grid, x-major.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size;
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    /// Position of `coords` in the x-major order of [`Grid::iter_coords`], which is also the standard layout of an
    /// `Array2` shaped `[width, height]`.
    pub fn linear_index(&self, (x, y): Coord2) -> usize {
        usize::from(x) * usize::from(self.size.1) + usize::from(y)
    }

    pub fn coords_at(&self, index: usize) -> Coord2 {
        let height = usize::from(self.size.1);
        ((index / height) as Coord, (index % height) as Coord)
    }
}

/// Offsets to the eight surrounding cells, top row first.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The in-bounds neighbors of one cell, see [`Grid::neighbors_of`].
#[derive(Clone, Debug)]
pub struct NeighborIter {
    grid: Grid,
    center: Coord2,
    offsets: core::slice::Iter<'static, (i8, i8)>,
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = self.grid;
        let (x, y) = self.center;
        self.offsets.find_map(|&(dx, dy)| {
            let coords = (x.checked_add_signed(dx)?, y.checked_add_signed(dy)?);
            grid.contains(coords).then_some(coords)
        })
    }
}
