//! Random playouts: the evaluation signal of the search.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::board::Board;
use crate::game::core::{Move, Outcome};

/// Plays uniformly random legal moves from `board` until the game is over and
/// returns how it ended. A board that is already decided is returned as is,
/// without drawing any random numbers.
pub fn simulate<R: Rng + ?Sized>(mut board: Board, rng: &mut R) -> Outcome {
    loop {
        let (moves, outcome) = board.legal_moves_and_outcome();
        let Some(&next_move) = moves.choose(rng) else {
            debug_assert!(outcome.is_terminal());
            return outcome;
        };
        assert!(board.apply(next_move), "random move {next_move} is illegal");
    }
}

/// Picks one of the legal moves uniformly at random, `None` if the game is
/// over.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
    board.legal_moves().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::game::core::{Player, COLS, ROWS};

    #[test]
    fn playouts_terminate() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for first in [Player::Human, Player::Computer] {
            for _ in 0..100 {
                let outcome = simulate(Board::initial(first), &mut rng);
                assert!(outcome.is_terminal());
            }
        }
    }

    #[test]
    fn decided_board() {
        let board = Board::try_from("......./......./......./......./XXX..../OOOO... X").unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(simulate(board.clone(), &mut rng), Outcome::ComputerWins);
        assert_eq!(random_move(&board, &mut rng), None);
    }

    #[test]
    fn single_move_left() {
        // Only column 6 is open and its last cell is the final move of the
        // game.
        let board =
            Board::try_from("XOXOXO./XOXOXOX/OXOXOXO/OXOXOXO/XOXOXOX/XOXOXOX O").unwrap();
        assert_eq!(board.discs(), ROWS * COLS - 1);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(random_move(&board, &mut rng), Some(Move::new(6).unwrap()));
        assert_eq!(simulate(board, &mut rng), Outcome::Draw);
    }

    #[test]
    fn reproducible() {
        let playouts = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            (0..20)
                .map(|_| simulate(Board::initial(Player::Human), &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(playouts(3), playouts(3));
    }
}
