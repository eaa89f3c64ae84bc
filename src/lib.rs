//! Connect Four engine that picks the computer's moves with Monte Carlo Tree
//! Search using the UCT selection policy. For more information, see [README].
//!
//! The crate is split into the game rules ([`game`]) and the search
//! ([`search`]). [`Engine`] ties both together into a console game between a
//! human and the computer.
//!
//! ```
//! use fourline::game::board::Board;
//! use fourline::game::core::Player;
//! use fourline::search::{self, Budget, Config};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = Board::initial(Player::Computer);
//! let config = Config {
//!     budget: Budget::iterations(500),
//!     ..Config::default()
//! };
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let next_move = search::compute_move(&board, &config, &mut rng).unwrap();
//! assert!(board.legal_moves().contains(&next_move));
//! ```
//!
//! [README]: https://github.com/kirillbobyrev/fourline/blob/main/README.md

// TODO: Gradually move most of warnings to deny.
#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Playouts are the bottleneck of the search.
#![deny(clippy::perf)]

pub mod game;
pub mod search;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Target triple and optimization level. Produced by `build.rs`.
const TARGET: &str = include_str!(concat!(env!("OUT_DIR"), "/target"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints informations about the engine version and GitHub repository on
/// engine startup.
pub fn print_engine_info() {
    println!("Fourline {}", engine_version());
    println!("<https://github.com/kirillbobyrev/fourline>");
}

/// Prints information the build type, target and whether the build is clean
/// on engine startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Target: {TARGET}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
