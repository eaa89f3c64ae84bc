//! Game primitives commonly used within [`crate::game`] and by the search.

use std::fmt;
use std::ops::Not;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;

/// Number of rows in the grid. Row 0 is the top one, discs fall towards row
/// `ROWS - 1`.
pub const ROWS: usize = 6;
/// Number of columns in the grid, which is also the maximum number of moves
/// available in any position.
pub const COLS: usize = 7;
/// Number of contiguous discs of the same player needed to win.
pub const CONNECT: usize = 4;

/// The game is played between the human and the computer. The computer is the
/// one running the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    #[allow(missing_docs)]
    Human,
    #[allow(missing_docs)]
    Computer,
}

impl Player {
    /// "Flips" the player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }

    /// Character used for the player's discs when printing the board.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Human => 'X',
            Self::Computer => 'O',
        }
    }

    pub(crate) fn from_marker(marker: char) -> anyhow::Result<Self> {
        match marker {
            'X' => Ok(Self::Human),
            'O' => Ok(Self::Computer),
            _ => bail!("player marker should be 'X' or 'O', got '{marker}'"),
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    /// Accepts the disc markers, the player names and the `0`/`1` shorthand
    /// used when asking who starts the game.
    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player.trim().to_ascii_lowercase().as_str() {
            "x" | "0" | "human" => Ok(Self::Human),
            "o" | "1" | "computer" => Ok(Self::Computer),
            _ => bail!("player should be 'human' (0, X) or 'computer' (1, O), got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Dropping a disc into one of the columns is the only kind of move. A [`Move`]
/// is always within the grid, but it might still be illegal in a given
/// position if its column is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    column: u8,
}

impl Move {
    /// Creates a move targeting `column`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is outside of `[0, COLS)`.
    pub fn new(column: usize) -> anyhow::Result<Self> {
        if column >= COLS {
            bail!("column {column} is out of range, expected 0..{COLS}");
        }
        Ok(Self::in_range(column))
    }

    /// Caller guarantees `column < COLS`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn in_range(column: usize) -> Self {
        debug_assert!(column < COLS);
        Self {
            column: column as u8,
        }
    }

    /// Index of the targeted column.
    #[must_use]
    pub const fn column(self) -> usize {
        self.column as usize
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let column = input
            .parse::<usize>()
            .with_context(|| format!("expected a column number, got '{input}'"))?;
        Self::new(column)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column)
    }
}

/// Legal moves in a position, ordered by column. There can be at most [`COLS`]
/// of them, so the list lives on the stack.
pub type MoveList = ArrayVec<Move, COLS>;

/// State of the game as determined by the board contents alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The game goes on: nobody connected four and there are empty cells.
    Ongoing,
    /// The grid is full and nobody connected four.
    Draw,
    #[allow(missing_docs)]
    ComputerWins,
    #[allow(missing_docs)]
    HumanWins,
}

impl Outcome {
    /// Outcome where `player` is the winner.
    #[must_use]
    pub const fn win_for(player: Player) -> Self {
        match player {
            Player::Human => Self::HumanWins,
            Player::Computer => Self::ComputerWins,
        }
    }

    /// Returns the winner, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::HumanWins => Some(Player::Human),
            Self::ComputerWins => Some(Player::Computer),
            Self::Ongoing | Self::Draw => None,
        }
    }

    /// The game is over: either someone won or the grid is full.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ongoing => "ongoing",
            Self::Draw => "draw",
            Self::ComputerWins => "computer wins",
            Self::HumanWins => "human wins",
        })
    }
}
