//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the [`Matchmaker`](crate::Matchmaker).
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Only accept a move from the session participant whose side is to
    /// move. Off by default: the game alone judges a move, and any
    /// connection that knows the session id moves for the side to move.
    pub strict_turns: bool,

    /// How many `EitherRandom` players, not counting the newcomer, must be
    /// waiting before a newcomer with that preference is paired from the
    /// `EitherRandom` lane. With the default of 2 a lone `EitherRandom`
    /// waiter is never paired with a second one.
    pub random_pairing_threshold: usize,

    /// Send `moveRejected` to the mover when a move is ignored. Off by
    /// default: rejected moves are silent.
    pub report_rejections: bool,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            strict_turns: false,
            random_pairing_threshold: 2,
            report_rejections: false,
        }
    }
}
