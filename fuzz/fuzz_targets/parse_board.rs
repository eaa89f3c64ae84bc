#![no_main]
use fourline::game::board::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::try_from(input) else {
        return;
    };
    let notation = board.to_string();
    assert_eq!(
        Board::try_from(notation.as_str()).expect("printed board should be parsed back"),
        board
    );
    assert_eq!(board.legal_moves().is_empty(), board.outcome().is_terminal());
});
