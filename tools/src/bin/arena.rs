//! Plays a batch of games between two search configurations, or between a
//! search and a player making uniformly random moves, and prints the totals.
//! Useful for tuning the exploration constant and the budget.

use std::num::NonZeroU64;

use clap::Parser;
use fourline::game::board::Board;
use fourline::game::core::{Move, Outcome, Player};
use fourline::search::simulation::random_move;
use fourline::search::{self, Budget, Config, DEFAULT_EXPLORATION};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "Play search configurations against each other")]
struct Args {
    /// Number of games to play. Players alternate making the first move.
    #[arg(long, default_value_t = 100)]
    games: u64,
    /// Iterations per move of the first player.
    #[arg(long, default_value = "1000")]
    iterations: NonZeroU64,
    /// Exploration constant of the first player.
    #[arg(long, default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,
    /// Iterations per move of the second player.
    #[arg(long, default_value = "1000")]
    opponent_iterations: NonZeroU64,
    /// Exploration constant of the second player.
    #[arg(long, default_value_t = DEFAULT_EXPLORATION)]
    opponent_exploration: f64,
    /// The second player makes uniformly random moves instead of searching.
    #[arg(long)]
    random_opponent: bool,
    /// Game `i` is played with seed `seed + i`.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Log filter, `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Either side of a game.
#[derive(Clone, Copy, Debug)]
enum Contender {
    Search(Config),
    Random,
}

impl Contender {
    fn pick(&self, board: &Board, rng: &mut ChaCha20Rng) -> anyhow::Result<Move> {
        match self {
            Self::Search(config) => search::compute_move(board, config, rng),
            Self::Random => random_move(board, rng)
                .ok_or_else(|| anyhow::anyhow!("no legal moves in {board}")),
        }
    }
}

#[derive(Default, Debug)]
struct Tally {
    wins: u64,
    draws: u64,
    losses: u64,
}

impl Tally {
    fn record(mut self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::ComputerWins => self.wins += 1,
            Outcome::HumanWins => self.losses += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => unreachable!("recording a game which is not over"),
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            wins: self.wins + other.wins,
            draws: self.draws + other.draws,
            losses: self.losses + other.losses,
        }
    }
}

/// The first contender plays as [`Player::Computer`], the second one as
/// [`Player::Human`].
fn play_game(
    index: u64,
    first: Contender,
    second: Contender,
    seed: u64,
) -> anyhow::Result<Outcome> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(index));
    let starts = if index % 2 == 0 {
        Player::Computer
    } else {
        Player::Human
    };
    let mut board = Board::initial(starts);
    loop {
        let outcome = board.outcome();
        if outcome.is_terminal() {
            debug!(index, %outcome, final_position = %board, "game finished");
            return Ok(outcome);
        }
        let contender = match board.to_move() {
            Player::Computer => first,
            Player::Human => second,
        };
        let next_move = contender.pick(&board, &mut rng)?;
        assert!(board.apply(next_move), "{contender:?} picked illegal move {next_move}");
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let first = Contender::Search(Config {
        exploration: args.exploration,
        budget: Budget::Iterations(args.iterations),
    });
    let second = if args.random_opponent {
        Contender::Random
    } else {
        Contender::Search(Config {
            exploration: args.opponent_exploration,
            budget: Budget::Iterations(args.opponent_iterations),
        })
    };
    info!(?first, ?second, games = args.games, "starting the arena");

    let outcomes = (0..args.games)
        .into_par_iter()
        .map(|index| play_game(index, first, second, args.seed))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let tally = outcomes
        .into_par_iter()
        .fold(Tally::default, Tally::record)
        .reduce(Tally::default, Tally::merge);

    println!("{first:?} vs {second:?}");
    println!(
        "games: {}, wins: {}, draws: {}, losses: {}",
        args.games, tally.wins, tally.draws, tally.losses
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_vs_random(index: u64) -> Outcome {
        play_game(index, Contender::Random, Contender::Random, 42).unwrap()
    }

    #[test]
    fn games_are_played_to_the_end() {
        for index in 0..20 {
            assert!(random_vs_random(index).is_terminal());
        }
        assert_eq!(random_vs_random(5), random_vs_random(5));
    }

    #[test]
    fn tally() {
        let tally = [Outcome::ComputerWins, Outcome::Draw, Outcome::HumanWins, Outcome::ComputerWins]
            .into_iter()
            .fold(Tally::default(), Tally::record)
            .merge(Tally::default().record(Outcome::Draw));
        assert_eq!((tally.wins, tally.draws, tally.losses), (2, 2, 1));
    }

    #[test]
    #[should_panic(expected = "not over")]
    fn unfinished_game_is_not_a_draw() {
        let _ = Tally::default().record(Outcome::Ongoing);
    }
}
