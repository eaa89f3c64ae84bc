//! Provides the [`Board`]: the grid of discs and the player to move. The move
//! generator and terminal state detection are implemented here, too, since
//! both of them only need the grid contents.

use std::fmt::{self, Write};

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::game::core::{Move, MoveList, Outcome, Player, COLS, CONNECT, ROWS};

/// Directions in which four in a row are searched for, as `(row, column)`
/// steps: →, ↓, ↘ and ↙. Starting from every occupied cell, these cover every
/// line on the grid.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Grid contents and the player to move.
///
/// The board is only ever mutated by [`Board::apply`], which drops a disc of
/// the player to move into a column and passes the turn. A non-empty cell
/// never becomes empty again.
///
/// [`Board::try_from()`] parses the compact notation produced by the
/// [`fmt::Display`] implementation: rows from top to bottom separated by `/`,
/// `.` for an empty cell, player markers for discs and then the marker of the
/// player to move.
///
/// ```
/// use fourline::game::board::Board;
/// use fourline::game::core::{Move, Outcome, Player};
///
/// let mut board =
///     Board::try_from("......./......./......./......./XXX..../OOO.... O").unwrap();
/// assert_eq!(board.outcome(), Outcome::Ongoing);
/// assert!(board.apply(Move::new(3).unwrap()));
/// assert_eq!(board.outcome(), Outcome::ComputerWins);
/// assert_eq!(board.to_move(), Player::Human);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Player>; COLS]; ROWS],
    to_move: Player,
}

impl Board {
    /// Creates an empty grid where `first` makes the first move.
    #[must_use]
    pub const fn initial(first: Player) -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
            to_move: first,
        }
    }

    /// The player whose disc will be dropped by the next [`Board::apply`].
    #[must_use]
    pub const fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the disc in the given cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside of the grid.
    #[must_use]
    pub const fn at(&self, row: usize, column: usize) -> Option<Player> {
        self.cells[row][column]
    }

    /// Drops a disc of the player to move into the lowest empty cell of the
    /// move's column and passes the turn to the opponent.
    ///
    /// Returns `false` and leaves the board untouched if the column is full.
    #[must_use]
    pub fn apply(&mut self, next_move: Move) -> bool {
        let column = next_move.column();
        match (0..ROWS).rev().find(|&row| self.cells[row][column].is_none()) {
            Some(row) => {
                self.cells[row][column] = Some(self.to_move);
                self.to_move = !self.to_move;
                true
            },
            None => false,
        }
    }

    /// Returns the moves that can be played: a column is available as long as
    /// its top cell is empty. Moves are ordered by column.
    ///
    /// Once the game is over (someone won or the grid is full) there are no
    /// legal moves.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.legal_moves_and_outcome().0
    }

    /// Computes both the outcome and the legal moves in one go. This is what
    /// the game driver needs to validate input and detect the end of the game.
    #[must_use]
    pub fn legal_moves_and_outcome(&self) -> (MoveList, Outcome) {
        let outcome = self.outcome();
        let mut moves = MoveList::new();
        if !outcome.is_terminal() {
            moves.extend(
                (0..COLS)
                    .filter(|&column| self.cells[0][column].is_none())
                    .map(Move::in_range),
            );
        }
        (moves, outcome)
    }

    /// Determines the outcome of the game from the grid contents.
    ///
    /// A legal sequence of moves can not produce two winners, so the first
    /// four in a row found decides the game.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        let mut occupied = 0;
        for (row, column) in (0..ROWS).cartesian_product(0..COLS) {
            let Some(player) = self.cells[row][column] else {
                continue;
            };
            occupied += 1;
            if DIRECTIONS
                .iter()
                .any(|&direction| self.connects(player, row, column, direction))
            {
                return Outcome::win_for(player);
            }
        }
        if occupied == ROWS * COLS {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// Number of discs on the grid.
    #[must_use]
    pub fn discs(&self) -> usize {
        self.cells.iter().flatten().flatten().count()
    }

    /// Checks whether `CONNECT` discs of `player` line up starting from
    /// `(row, column)` in the given direction.
    #[allow(clippy::cast_possible_wrap)]
    fn connects(
        &self,
        player: Player,
        row: usize,
        column: usize,
        (row_step, column_step): (isize, isize),
    ) -> bool {
        (0..CONNECT).all(|k| {
            let k = k as isize;
            match (
                row.checked_add_signed(k * row_step),
                column.checked_add_signed(k * column_step),
            ) {
                (Some(r), Some(c)) if r < ROWS && c < COLS => self.cells[r][c] == Some(player),
                _ => false,
            }
        })
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let Some((grid, to_move)) = input.split_once(' ') else {
            bail!("expected the grid and the player to move separated by a space, got '{input}'");
        };
        let mut to_move = to_move.trim().chars();
        let (Some(marker), None) = (to_move.next(), to_move.next()) else {
            bail!("expected a single marker of the player to move in '{input}'");
        };
        let mut board = Self::initial(
            Player::from_marker(marker).context("parsing the player to move")?,
        );

        let rows = grid.split('/').collect_vec();
        if rows.len() != ROWS {
            bail!("expected {ROWS} rows, got {}", rows.len());
        }
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.chars().count() != COLS {
                bail!("expected {COLS} cells in row {row}, got '{cells}'");
            }
            for (column, cell) in cells.chars().enumerate() {
                board.cells[row][column] = match cell {
                    '.' => None,
                    marker => Some(
                        Player::from_marker(marker)
                            .with_context(|| format!("parsing row {row}, column {column}"))?,
                    ),
                };
            }
        }

        for (row, column) in (1..ROWS).cartesian_product(0..COLS) {
            if board.cells[row - 1][column].is_some() && board.cells[row][column].is_none() {
                bail!("disc at row {} column {column} is floating above an empty cell", row - 1);
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Prints the board in the notation accepted by [`Board::try_from()`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            if row > 0 {
                f.write_char('/')?;
            }
            for cell in cells {
                f.write_char(cell.map_or('.', Player::marker))?;
            }
        }
        write!(f, " {}", self.to_move)
    }
}

impl fmt::Debug for Board {
    /// Renders the grid for the console with column and row indices.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(4 * (COLS + 1));
        writeln!(f, "   |{}", (0..COLS).map(|column| format!(" {column} |")).join(""))?;
        writeln!(f, "{separator}")?;
        for (row, cells) in self.cells.iter().enumerate() {
            writeln!(
                f,
                " {row} |{}",
                cells
                    .iter()
                    .map(|cell| format!(" {} |", cell.map_or(' ', Player::marker)))
                    .join("")
            )?;
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}
