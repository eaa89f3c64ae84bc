#![no_main]
use fourline::game::board::Board;
use fourline::game::core::{Move, Outcome, Player, COLS, ROWS};
use libfuzzer_sys::fuzz_target;

// Every byte is a column to drop a disc into, the first one also picks who
// starts.
fuzz_target!(|data: &[u8]| {
    let Some((&first, columns)) = data.split_first() else {
        return;
    };
    let first = if first % 2 == 0 {
        Player::Human
    } else {
        Player::Computer
    };
    let mut board = Board::initial(first);
    for &column in columns {
        let next_move = Move::new(usize::from(column) % COLS).expect("column is in range");
        let (moves, outcome) = board.legal_moves_and_outcome();
        if outcome.is_terminal() {
            assert!(moves.is_empty());
            if outcome == Outcome::Draw {
                assert_eq!(board.discs(), ROWS * COLS);
            }
            return;
        }

        let before = board.clone();
        if board.apply(next_move) {
            assert!(moves.contains(&next_move));
            assert_eq!(board.discs(), before.discs() + 1);
            assert_eq!(board.to_move(), !before.to_move());
        } else {
            assert!(!moves.contains(&next_move));
            assert_eq!(board, before);
        }
    }
});
