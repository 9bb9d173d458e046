//! Error types for the game engine.

use matchboard_protocol::Outcome;

/// Why a move was not applied. A rejected move never changes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The position is not a cell of the 3×3 board (valid: 0–8).
    #[error("cell {0} is off the board")]
    OutOfBounds(u8),

    /// The cell already holds a mark.
    #[error("cell {0} is occupied")]
    Occupied(u8),

    /// The game has already ended.
    #[error("game is over ({0})")]
    GameOver(Outcome),
}
