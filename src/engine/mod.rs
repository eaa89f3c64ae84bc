//! The engine runs a console game between a human and the computer: it keeps
//! the authoritative board, reads the human's moves from the input stream and
//! asks the [`crate::search`] for the computer's moves.
//!
//! [`Engine::play`] is the "main loop" of the game.

use std::io::{BufRead, Write};

use anyhow::bail;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::game::board::Board;
use crate::game::core::{Outcome, Player};
use crate::search::{self, Config};

mod command;
use command::Command;

/// The Engine connects the game rules, the search and the I/O.
pub struct Engine<R: BufRead, W: Write> {
    config: Config,
    /// The only source of randomness for the whole game, seeded once.
    rng: ChaCha20Rng,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Engine<R, W> {
    /// Creates a new instance of the engine with provided search parameters,
    /// random number generator and I/O.
    #[must_use]
    pub const fn new(input: R, output: W, config: Config, rng: ChaCha20Rng) -> Self {
        Self {
            config,
            rng,
            input,
            output,
        }
    }

    /// Plays one game until it is over or the human quits and returns the
    /// final outcome (which is [`Outcome::Ongoing`] if the human quit).
    ///
    /// If `first` is not given, the human is asked who starts.
    ///
    /// Invalid input from the human (not a number, out of range or full
    /// column) is reported and asked again.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails or if the input ends
    /// before the game does.
    pub fn play(&mut self, first: Option<Player>) -> anyhow::Result<Outcome> {
        let first = match first {
            Some(player) => player,
            None => self.ask_first_player()?,
        };
        info!(%first, "starting a new game");
        let mut board = Board::initial(first);

        loop {
            writeln!(self.output)?;
            write!(self.output, "{board:?}")?;

            let (moves, outcome) = board.legal_moves_and_outcome();
            if outcome.is_terminal() {
                self.announce(outcome)?;
                return Ok(outcome);
            }
            debug!(position = %board, legal_moves = moves.len(), "next turn");

            let applied = match board.to_move() {
                Player::Human => {
                    let Some(command) = self.read_command("which column? ")? else {
                        bail!("input ended before the game was over");
                    };
                    match command {
                        Command::Column(next_move) => {
                            if board.apply(next_move) {
                                true
                            } else {
                                writeln!(self.output, "column {next_move} is full, try another one")?;
                                false
                            }
                        },
                        Command::Quit => {
                            info!(position = %board, "the human left the game");
                            return Ok(outcome);
                        },
                        Command::Unknown(reason) => {
                            writeln!(self.output, "{reason}")?;
                            false
                        },
                    }
                },
                Player::Computer => {
                    let next_move = search::compute_move(&board, &self.config, &mut self.rng)?;
                    writeln!(self.output, "computer plays column {next_move}")?;
                    assert!(board.apply(next_move), "search returned illegal move {next_move}");
                    true
                },
            };
            if !applied {
                debug!(position = %board, "move rejected, asking again");
            }
        }
    }

    /// Asks who starts until a valid answer is given.
    fn ask_first_player(&mut self) -> anyhow::Result<Player> {
        loop {
            write!(self.output, "who starts (0: human, 1: computer)? ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                bail!("input ended before the first player was chosen");
            };
            match Player::try_from(line.as_str()) {
                Ok(player) => return Ok(player),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Prompts for and parses the next human command. `None` at the end of
    /// input.
    fn read_command(&mut self, prompt: &str) -> anyhow::Result<Option<Command>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| Command::parse(&line)))
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    fn announce(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        info!(%outcome, "game over");
        let message = match outcome {
            Outcome::ComputerWins => "** computer wins **",
            Outcome::HumanWins => "** you win **",
            Outcome::Draw => "** draw **",
            Outcome::Ongoing => unreachable!("announcing a game which is not over"),
        };
        writeln!(self.output)?;
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}
