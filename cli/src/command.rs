use clap::{Parser, Subcommand, ValueEnum};
use sweeper_core::{Coord, Difficulty};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    /// 9x9 with 10 mines
    Beginner,
    /// 16x16 with 40 mines
    Intermediate,
    /// 30x16 with 99 mines
    Expert,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Intermediate => Difficulty::Intermediate,
            DifficultyArg::Expert => Difficulty::Expert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// One line typed by the player.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reveal the cell at column X, row Y
    #[command(visible_alias = "r")]
    Reveal { x: Coord, y: Coord },
    /// Cycle the marker on the cell at column X, row Y
    #[command(visible_alias = "f")]
    Flag { x: Coord, y: Coord },
    /// Start over on the same board size
    #[command(visible_aliases = ["n", "new"])]
    Restart,
    /// Start over on a preset board
    #[command(visible_aliases = ["d", "difficulty"])]
    Preset { level: DifficultyArg },
    /// Draw the board again
    #[command(visible_alias = "p")]
    Print,
    /// Leave the game
    #[command(visible_aliases = ["q", "exit"])]
    Quit,
}

impl Command {
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Line::try_parse_from(line.split_whitespace()).map(|line| line.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_with_aliases() {
        assert_eq!(
            Command::parse_line("reveal 3 4").unwrap(),
            Command::Reveal { x: 3, y: 4 }
        );
        assert_eq!(
            Command::parse_line("  f 0  8 ").unwrap(),
            Command::Flag { x: 0, y: 8 }
        );
        assert_eq!(Command::parse_line("n").unwrap(), Command::Restart);
        assert_eq!(Command::parse_line("q").unwrap(), Command::Quit);
    }

    #[test]
    fn parses_presets() {
        assert_eq!(
            Command::parse_line("d expert").unwrap(),
            Command::Preset {
                level: DifficultyArg::Expert
            }
        );
        assert_eq!(
            Difficulty::from(DifficultyArg::Intermediate).config().mines,
            40
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(Command::parse_line("reveal 3").is_err());
        assert!(Command::parse_line("reveal -1 2").is_err());
        assert!(Command::parse_line("reveal 300 2").is_err());
        assert!(Command::parse_line("dance").is_err());
        assert!(Command::parse_line("").is_err());
    }
}
