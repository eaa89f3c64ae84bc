//! [Search] picks the computer's move. It uses [Monte Carlo Tree Search] with
//! the UCT selection policy: the position is evaluated by random playouts and
//! the search tree grows towards the most promising continuations while still
//! exploring the rarely visited ones.
//!
//! [Search]: https://www.chessprogramming.org/Search
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::num::NonZeroU64;
use std::time::{Duration, Instant};

use anyhow::bail;
use rand::Rng;

use crate::game::board::Board;
use crate::game::core::Move;

pub mod mcts;
pub mod simulation;
pub mod tree;

pub use mcts::{Search, SearchResult};

/// Exploration constant of the UCT formula, roughly √2.
pub const DEFAULT_EXPLORATION: f64 = 1.414;

/// Thinking time per move when nothing else is requested.
pub const DEFAULT_TIME: Duration = Duration::from_secs(15);

/// Limits how long the search runs. The budget is only checked between
/// iterations: an iteration that started before the deadline always finishes
/// its playout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Wall clock time.
    Time(Duration),
    /// Exact number of iterations. Unlike [`Budget::Time`], this makes the
    /// search reproducible for a fixed random seed.
    Iterations(NonZeroU64),
}

impl Budget {
    /// Convenience constructor for [`Budget::Iterations`].
    ///
    /// # Panics
    ///
    /// Panics if `iterations` is zero: the search needs at least one iteration
    /// to have a move to return.
    #[must_use]
    pub const fn iterations(iterations: u64) -> Self {
        match NonZeroU64::new(iterations) {
            Some(iterations) => Self::Iterations(iterations),
            None => panic!("iteration budget must be positive"),
        }
    }
}

/// Parameters of the search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Exploration constant `C` in `win_rate + C * sqrt(ln(N) / n)`.
    pub exploration: f64,
    /// When to stop searching and return the move.
    pub budget: Budget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            budget: Budget::Time(DEFAULT_TIME),
        }
    }
}

/// Keeps track of the search budget.
pub(crate) struct Limiter {
    pub(crate) timer: Instant,
    pub(crate) budget: Budget,
}

impl Limiter {
    pub(crate) fn new(budget: Budget) -> Self {
        Self {
            timer: Instant::now(),
            budget,
        }
    }

    /// Returns `true` once the search should stop after completing
    /// `iterations` iterations.
    pub(crate) fn exhausted(&self, iterations: u64) -> bool {
        match self.budget {
            Budget::Time(time) => self.timer.elapsed() >= time,
            Budget::Iterations(limit) => iterations >= limit.get(),
        }
    }
}

/// Runs the search from `board` and returns the move for the player to move.
/// The board itself is not modified: the search works on its own copy.
///
/// # Errors
///
/// Returns an error if the game is already over.
pub fn compute_move<R: Rng + ?Sized>(
    board: &Board,
    config: &Config,
    rng: &mut R,
) -> anyhow::Result<Move> {
    let outcome = board.outcome();
    if outcome.is_terminal() {
        bail!("can not search for a move, the game is over: {outcome}");
    }
    let mut search = Search::new(board.clone(), *config);
    Ok(search.run(rng).best_move)
}
