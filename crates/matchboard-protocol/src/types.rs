//! Core protocol types: identities and the game vocabulary shared by the
//! lobby, the game engine, and the wire.

use std::fmt;

use matchboard_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies a player for as long as their connection lives.
///
/// There are no accounts: a player *is* a connection. The value is the
/// transport's connection counter, so it is never reused within a process.
///
/// Serializes as a plain number (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl From<ConnectionId> for PlayerId {
    fn from(id: ConnectionId) -> Self {
        Self(id.into_inner())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifies a game session. Clients echo it back as the `room` of every
/// move, so it is the routing key for the session's lifetime.
///
/// Built as `game-<seq>-<requester>-<opponent>`, where `seq` is the
/// matchmaker's pairing counter. The counter makes every pairing unique,
/// even when the same two players meet again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Derives the session id for pairing number `seq`. Order matters: the
    /// player whose arrival triggered the pairing comes first.
    pub fn for_pair(seq: u64, requester: PlayerId, opponent: PlayerId) -> Self {
        Self(format!("game-{seq}-{}-{}", requester.0, opponent.0))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Sides and preferences
// ---------------------------------------------------------------------------

/// One of the two seats in a game. `First` always moves first.
///
/// Older clients spell the sides `"X"` and `"O"`; both spellings are
/// accepted on input, the long form is always written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(alias = "X")]
    First,
    #[serde(alias = "O")]
    Second,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "First"),
            Self::Second => write!(f, "Second"),
        }
    }
}

/// The side a player asks for when joining the queue.
///
/// `EitherRandom` only widens which opponents are eligible. The pairing
/// itself is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preference {
    #[serde(alias = "X")]
    First,
    #[serde(alias = "O")]
    Second,
    #[serde(alias = "R")]
    EitherRandom,
}

impl Preference {
    /// All preferences, in the order the wait queues are stored.
    pub const ALL: [Preference; 3] = [Self::First, Self::Second, Self::EitherRandom];
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "First"),
            Self::Second => write!(f, "Second"),
            Self::EitherRandom => write!(f, "EitherRandom"),
        }
    }
}

// ---------------------------------------------------------------------------
// Board and outcome
// ---------------------------------------------------------------------------

/// Nine cells in row-major order; `None` is an empty cell.
///
/// On the wire: `[null, "First", null, ...]`.
pub type Board = [Option<Side>; 9];

/// A board with every cell empty.
pub const EMPTY_BOARD: Board = [None; 9];

/// The state of a game as far as winning is concerned.
///
/// ```text
/// InProgress ──(line completed)──→ Win(side)
///      │
///      └─────(board full)────────→ Draw
/// ```
///
/// Serialized adjacently tagged: `{"state":"Win","winner":"First"}`,
/// `{"state":"Draw"}`, `{"state":"InProgress"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner")]
pub enum Outcome {
    #[default]
    InProgress,
    Win(Side),
    Draw,
}

impl Outcome {
    /// Returns `true` once the game has ended (win or draw).
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "InProgress"),
            Self::Win(side) => write!(f, "Win({side})"),
            Self::Draw => write!(f, "Draw"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! These pin down the JSON shapes browser clients depend on.

    use super::*;

    #[test]
    fn test_player_id_from_connection_id() {
        let pid = PlayerId::from(ConnectionId::new(9));
        assert_eq!(pid, PlayerId(9));
        assert_eq!(pid.to_string(), "P-9");
    }

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&PlayerId(42)).unwrap(), "42");
    }

    #[test]
    fn test_session_id_for_pair_puts_requester_first() {
        let id = SessionId::for_pair(1, PlayerId(7), PlayerId(3));
        assert_eq!(id.as_str(), "game-1-7-3");
        assert_ne!(id, SessionId::for_pair(1, PlayerId(3), PlayerId(7)));
    }

    #[test]
    fn test_session_id_differs_per_pairing_of_same_players() {
        let a = SessionId::for_pair(1, PlayerId(7), PlayerId(3));
        let b = SessionId::for_pair(2, PlayerId(7), PlayerId(3));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SessionId::from("game-1-2")).unwrap();
        assert_eq!(json, "\"game-1-2\"");
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::First.opponent(), Side::Second);
        assert_eq!(Side::Second.opponent(), Side::First);
    }

    #[test]
    fn test_side_accepts_legacy_letters() {
        let x: Side = serde_json::from_str("\"X\"").unwrap();
        let o: Side = serde_json::from_str("\"O\"").unwrap();
        assert_eq!((x, o), (Side::First, Side::Second));
        assert_eq!(serde_json::to_string(&Side::First).unwrap(), "\"First\"");
    }

    #[test]
    fn test_preference_accepts_long_and_legacy_names() {
        let cases = [
            ("\"First\"", Preference::First),
            ("\"Second\"", Preference::Second),
            ("\"EitherRandom\"", Preference::EitherRandom),
            ("\"X\"", Preference::First),
            ("\"O\"", Preference::Second),
            ("\"R\"", Preference::EitherRandom),
        ];
        for (json, expected) in cases {
            let parsed: Preference = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected, "{json}");
        }
    }

    #[test]
    fn test_preference_rejects_unknown_choice() {
        assert!(serde_json::from_str::<Preference>("\"Middle\"").is_err());
    }

    #[test]
    fn test_board_serializes_empty_cells_as_null() {
        let mut board = EMPTY_BOARD;
        board[4] = Some(Side::Second);
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(
            json,
            serde_json::json!([null, null, null, null, "Second", null, null, null, null])
        );
    }

    #[test]
    fn test_outcome_json_format() {
        let win = serde_json::to_value(Outcome::Win(Side::First)).unwrap();
        assert_eq!(win, serde_json::json!({"state": "Win", "winner": "First"}));

        let draw = serde_json::to_value(Outcome::Draw).unwrap();
        assert_eq!(draw, serde_json::json!({"state": "Draw"}));

        let live = serde_json::to_value(Outcome::InProgress).unwrap();
        assert_eq!(live, serde_json::json!({"state": "InProgress"}));
    }

    #[test]
    fn test_outcome_is_terminal() {
        assert!(!Outcome::InProgress.is_terminal());
        assert!(Outcome::Draw.is_terminal());
        assert!(Outcome::Win(Side::Second).is_terminal());
    }
}
