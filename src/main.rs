use std::io;
use std::num::NonZeroU64;
use std::time::Duration;

use clap::Parser;
use fourline::game::core::Player;
use fourline::search::{Budget, Config, DEFAULT_EXPLORATION};
use fourline::Engine;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

/// Play Connect Four against the computer in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Time the computer spends on each move, in milliseconds.
    #[arg(long, env = "FOURLINE_TIME_MS", default_value_t = 15_000)]
    time_ms: u64,
    /// Fixed number of search iterations per move instead of the time limit.
    #[arg(long, env = "FOURLINE_ITERATIONS", conflicts_with = "time_ms")]
    iterations: Option<NonZeroU64>,
    /// Exploration constant of the UCT formula.
    #[arg(long, env = "FOURLINE_EXPLORATION", default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,
    /// Seed of the random number generator. Random if not set.
    #[arg(long, env = "FOURLINE_SEED")]
    seed: Option<u64>,
    /// Who makes the first move: "human" (0) or "computer" (1). Asked
    /// interactively if not set.
    #[arg(long, env = "FOURLINE_FIRST", value_parser = parse_player)]
    first: Option<Player>,
    /// Log filter, e.g. "info" or "fourline::search=trace". `RUST_LOG` takes
    /// precedence.
    #[arg(long, env = "FOURLINE_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

fn parse_player(input: &str) -> anyhow::Result<Player> {
    Player::try_from(input)
}

fn init_tracing(level: &str) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    fourline::print_engine_info();
    fourline::print_binary_info();

    let budget = cli.iterations.map_or_else(
        || Budget::Time(Duration::from_millis(cli.time_ms)),
        Budget::Iterations,
    );
    let config = Config {
        exploration: cli.exploration,
        budget,
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, ?config, "configured the engine");

    let mut engine = Engine::new(
        io::stdin().lock(),
        io::stdout().lock(),
        config,
        ChaCha20Rng::seed_from_u64(seed),
    );
    let outcome = engine.play(cli.first)?;
    info!(%outcome, "exiting");
    Ok(())
}
