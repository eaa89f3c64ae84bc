//! Implementation of the Connect Four rules: the grid, dropping discs into
//! columns, move generation and detection of wins and draws.

pub mod board;
pub mod core;
