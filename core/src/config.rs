use serde::{Deserialize, Serialize};

use crate::*;

/// How the flag action cycles the marker of an unrevealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagPolicy {
    /// Untouched <-> flagged.
    #[default]
    Binary,
    /// Untouched -> flagged -> guessed -> untouched. Guessed cells are cosmetic and can still be revealed.
    TriState,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    pub flag_policy: FlagPolicy,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            flag_policy: FlagPolicy::Binary,
        }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_flag_policy(self, flag_policy: FlagPolicy) -> Self {
        Self {
            size: self.size,
            mines: self.mines,
            flag_policy,
        }
    }

    /// Checks for positive dimensions and `0 < mines < width * height`.
    pub fn validate(&self) -> Result<()> {
        Grid::new(self.size)?;

        if self.mines == 0 {
            return Err(GameError::InvalidConfiguration(
                "at least one mine is required",
            ));
        }

        if self.mines >= self.total_cells() {
            log::warn!(
                "Rejected {} mines on a {}x{} board",
                self.mines,
                self.size.0,
                self.size.1
            );
            return Err(GameError::InvalidConfiguration(
                "too many mines for the board size",
            ));
        }

        Ok(())
    }

    pub const fn grid(&self) -> Grid {
        Grid::new_unchecked(self.size)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

/// Named board presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((30, 16), 99),
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.config().validate(), Ok(()));
        }
        assert_eq!(Difficulty::Expert.config().total_cells(), 480);
        assert_eq!(Difficulty::Expert.config().safe_cells(), 381);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            GameConfig::new((0, 9), 1),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GameConfig::new((9, 0), 1),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_mine_counts_outside_open_range() {
        assert!(GameConfig::new((3, 3), 0).is_err());
        assert!(GameConfig::new((3, 3), 9).is_err());
        assert!(GameConfig::new((3, 3), 10).is_err());
        assert!(GameConfig::new((3, 3), 8).is_ok());
    }

    #[test]
    fn flag_policy_defaults_to_binary() {
        let config = GameConfig::new((4, 4), 3).unwrap();
        assert_eq!(config.flag_policy, FlagPolicy::Binary);

        let config = config.with_flag_policy(FlagPolicy::TriState);
        assert_eq!(config.flag_policy, FlagPolicy::TriState);
        assert_eq!(config.mines, 3);
    }
}
