//! Error types for the lobby layer.

use matchboard_game::MoveError;
use matchboard_protocol::{PlayerId, SessionId};

/// Why a move could not be routed or applied.
///
/// None of these are fatal. The matchmaker logs them and, depending on
/// [`LobbyConfig::report_rejections`](crate::LobbyConfig), tells the mover.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// No live session has this id (never existed, or already torn down).
    #[error("session {0} not found")]
    UnknownSession(SessionId),

    /// The mover is not seated in the addressed session.
    #[error("player {player} is not in session {session}")]
    NotParticipant {
        player: PlayerId,
        session: SessionId,
    },

    /// The mover is seated but it is the other side's move.
    #[error("not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The game engine rejected the move.
    #[error(transparent)]
    Move(#[from] MoveError),
}
