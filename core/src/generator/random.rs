use ndarray::Array2;

use super::*;

/// Purely random placement that keeps only the starting cell safe. Neighbors of the start may still hold mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;
        use rand::seq::index;

        config.validate()?;
        let grid = config.grid();
        let start = grid.validate_coords(self.start)?;

        // every cell except the start is a candidate, slots at or past the start shift up by one
        let start_index = grid.linear_index(start);
        let free_cells = usize::from(grid.total_cells()) - 1;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default(grid.size().to_nd_index());
        for slot in index::sample(&mut rng, free_cells, usize::from(config.mines)).iter() {
            let linear = if slot >= start_index { slot + 1 } else { slot };
            mines[grid.coords_at(linear).to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(grid, mines);
        log::debug!(
            "Placed {} mines on {:?} with seed {}, safe start {:?}",
            layout.mine_count(),
            grid.size(),
            self.seed,
            start
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn places_exact_count_and_keeps_start_safe() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            for seed in 0..50 {
                let start = (seed as Coord % config.size.0, 3);
                let layout = RandomMinefieldGenerator::new(seed, start)
                    .generate(config)
                    .unwrap();

                assert_eq!(layout.iter_mines().count(), usize::from(config.mines));
                assert_eq!(layout.mine_count(), config.mines);
                assert!(!layout.contains_mine(start));
            }
        }
    }

    #[test]
    fn adjacent_counts_match_generated_mines() {
        let config = Difficulty::Expert.config();
        for seed in 0..100 {
            let layout = RandomMinefieldGenerator::new(seed, (15, 8))
                .generate(config)
                .unwrap();

            for coords in layout.grid().iter_coords() {
                let expected = layout
                    .grid()
                    .neighbors(coords)
                    .filter(|&neighbor| layout.contains_mine(neighbor))
                    .count();
                assert_eq!(usize::from(layout.adjacent_mine_count(coords)), expected);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = Difficulty::Intermediate.config();

        let first = RandomMinefieldGenerator::new(7, (3, 3)).generate(config);
        let second = RandomMinefieldGenerator::new(7, (3, 3)).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn maximum_mines_fill_everything_but_start() {
        let config = GameConfig::new((4, 4), 15).unwrap();

        let layout = RandomMinefieldGenerator::new(3, (2, 1))
            .generate(config)
            .unwrap();

        for coords in layout.grid().iter_coords() {
            assert_eq!(layout.contains_mine(coords), coords != (2, 1));
        }
    }

    #[test]
    fn start_neighbors_are_not_protected() {
        // 3x3 with 8 mines leaves only the start safe, so every neighbor is mined
        let config = GameConfig::new((3, 3), 8).unwrap();

        let layout = RandomMinefieldGenerator::new(11, (1, 1))
            .generate(config)
            .unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 8);
    }

    #[test]
    fn placement_is_unbiased_across_cells() {
        // one mine on a 2x2 board, start at (0, 0): the other three cells should each get about a third
        let config = GameConfig::new((2, 2), 1).unwrap();
        let mut hits = vec![0u32; 4];
        let trials = 3000;

        for seed in 0..trials {
            let layout = RandomMinefieldGenerator::new(seed, (0, 0))
                .generate(config)
                .unwrap();
            for mine in layout.iter_mines() {
                hits[layout.grid().linear_index(mine)] += 1;
            }
        }

        assert_eq!(hits[0], 0);
        for &count in &hits[1..] {
            assert!((800..1200).contains(&count), "skewed placement: {hits:?}");
        }
    }

    #[test]
    fn rejects_invalid_requests() {
        let full = GameConfig::new_unchecked((3, 3), 9);
        assert!(matches!(
            RandomMinefieldGenerator::new(0, (0, 0)).generate(full),
            Err(GameError::InvalidConfiguration(_))
        ));

        let config = GameConfig::new((3, 3), 2).unwrap();
        assert_eq!(
            RandomMinefieldGenerator::new(0, (5, 0)).generate(config),
            Err(GameError::OutOfRange((5, 0)))
        );
    }
}
