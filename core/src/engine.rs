use alloc::collections::VecDeque;
use ndarray::Array2;

use crate::*;

/// Applies reveals from a fixed [`MineLayout`] onto a [`CellStore`], cascading through zero-count cells.
#[derive(Debug)]
pub struct RevealEngine<'a> {
    layout: &'a MineLayout,
    cells: &'a mut CellStore,
}

impl<'a> RevealEngine<'a> {
    pub fn new(layout: &'a MineLayout, cells: &'a mut CellStore) -> Self {
        debug_assert_eq!(layout.grid(), cells.grid());
        Self { layout, cells }
    }

    /// Reveals `coords` and, if it has no adjacent mines, everything reachable through other zero-count cells.
    ///
    /// Flagged or already revealed targets are a silent `NoChange`. Every cell that gets opened is reported to
    /// `observer`.
    pub fn reveal_from<O>(&mut self, coords: Coord2, observer: &mut O) -> Result<RevealOutcome>
    where
        O: GameObserver + ?Sized,
    {
        let coords = self.layout.grid().validate_coords(coords)?;

        if !self.cells.cell_at(coords).is_revealable() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.layout.contains_mine(coords) {
            self.cells.reveal_mine(coords);
            observer.on_cell_revealed(coords, CellView::TriggeredMine);
            log::debug!("Hit mine at {:?}", coords);
            return Ok(RevealOutcome::HitMine);
        }

        let adjacent_mines = self.layout.adjacent_mine_count(coords);
        self.cells.reveal(coords, adjacent_mines);
        observer.on_cell_revealed(coords, CellView::Revealed(adjacent_mines));
        log::debug!("Revealed {:?}, adjacent mines: {}", coords, adjacent_mines);

        if adjacent_mines == 0 {
            self.cascade(coords, observer);
        }

        if self.is_cleared() {
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Breadth-first flood fill from a revealed zero-count cell. Neighbors of a zero-count cell are never mines, so
    /// nothing opened here can explode.
    fn cascade<O>(&mut self, origin: Coord2, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        let grid = self.layout.grid();
        let mut queued: Array2<bool> = Array2::default(grid.size().to_nd_index());
        queued[origin.to_nd_index()] = true;
        let mut to_visit = VecDeque::new();
        self.enqueue_neighbors(origin, &mut queued, &mut to_visit);
        log::trace!("Starting flood-fill from {:?}, initial neighbors: {:?}", origin, to_visit);

        while let Some(visit_coords) = to_visit.pop_front() {
            debug_assert!(!self.layout.contains_mine(visit_coords));

            let visit_adjacent_mines = self.layout.adjacent_mine_count(visit_coords);
            if !self.cells.reveal(visit_coords, visit_adjacent_mines) {
                continue;
            }
            observer.on_cell_revealed(visit_coords, CellView::Revealed(visit_adjacent_mines));
            log::trace!(
                "Flood revealed {:?}, adjacent mines: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                self.enqueue_neighbors(visit_coords, &mut queued, &mut to_visit);
            }
        }
    }

    fn enqueue_neighbors(
        &self,
        coords: Coord2,
        queued: &mut Array2<bool>,
        to_visit: &mut VecDeque<Coord2>,
    ) {
        for pos in self.layout.grid().neighbors(coords) {
            let seen = &mut queued[pos.to_nd_index()];
            if !*seen && self.cells.cell_at(pos).is_revealable() {
                *seen = true;
                to_visit.push_back(pos);
            }
        }
    }

    fn is_cleared(&self) -> bool {
        self.cells.revealed_count() + self.layout.mine_count() == self.layout.total_cells()
    }
}
