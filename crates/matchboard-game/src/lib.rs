//! Rules engine for a single 3×3 game.
//!
//! A [`Game`] owns the board, whose turn it is, and the [`Outcome`]. It
//! knows nothing about players or connections. The lobby decides *who*
//! may move; the game decides whether the move is legal and what it does.
//!
//! # Key types
//!
//! - [`Game`]: board state and the `make_move` transition
//! - [`MoveError`]: why a move was rejected
//! - [`WINNING_LINES`]: the eight triples that win
//!
//! [`Outcome`]: matchboard_protocol::Outcome

mod error;
mod game;
mod lines;

pub use error::MoveError;
pub use game::{BOARD_CELLS, Game};
pub use lines::{WINNING_LINES, completes_line, is_full};
