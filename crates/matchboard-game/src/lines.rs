//! Win and draw detection over a flat board.

use matchboard_protocol::{Board, Side};

/// Cell triples that win: three rows, three columns, two diagonals.
///
/// ```text
///  0 | 1 | 2
///  3 | 4 | 5
///  6 | 7 | 8
/// ```
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns `true` if `side` holds all three cells of any winning line.
pub fn completes_line(board: &Board, side: Side) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| board[cell] == Some(side)))
}

/// Returns `true` if no cell is empty.
pub fn is_full(board: &Board) -> bool {
    board.iter().all(Option::is_some)
}
