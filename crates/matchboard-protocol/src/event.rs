//! Named events exchanged over a connection.
//!
//! Every frame is adjacently tagged: `{"event": "<name>", "data": {...}}`.
//! Event names are camelCase to match what browser clients already emit.
//!
//! ```text
//! client → server   joinGame, makeMove
//! server → client   matchFound, gameUpdate, playerDisconnected, moveRejected
//! ```

use serde::{Deserialize, Serialize};

use crate::{Board, Outcome, Preference, ProtocolError, SessionId, Side};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// An event sent by a client.
///
/// Disconnects are not an event: the transport reports them when the
/// stream closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter (or re-enter) the waiting queue with a side preference.
    JoinGame { choice: Preference },

    /// Place a mark in the session named by `room`.
    ///
    /// `position` is loosely typed on the wire; convert with
    /// [`MoveRequest::parse`] before it goes anywhere near game logic.
    MakeMove { room: SessionId, position: RawPosition },
}

/// A move position as clients actually send it: a number, a float that
/// happens to be integral, or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPosition {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawPosition {
    /// Coerces the raw value into a cell index candidate.
    ///
    /// Only the shape is checked here; whether the index is on the board
    /// is the game engine's call.
    pub fn to_index(&self) -> Result<u8, ProtocolError> {
        let value = match self {
            Self::Integer(i) => *i,
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                if *f < 0.0 || *f > f64::from(u8::MAX) {
                    return Err(out_of_range(self));
                }
                *f as i64
            }
            Self::Float(_) => {
                return Err(ProtocolError::InvalidMessage(format!(
                    "position {self:?} is not an integer"
                )));
            }
            Self::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                ProtocolError::InvalidMessage(format!(
                    "position {s:?} is not numeric"
                ))
            })?,
        };
        u8::try_from(value).map_err(|_| out_of_range(self))
    }
}

fn out_of_range(raw: &RawPosition) -> ProtocolError {
    ProtocolError::InvalidMessage(format!("position {raw:?} is out of range"))
}

impl From<u8> for RawPosition {
    fn from(position: u8) -> Self {
        Self::Integer(i64::from(position))
    }
}

/// A move in its strict shape, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// The session the move is addressed to.
    pub room: SessionId,
    /// The target cell. Not yet checked against the board size.
    pub position: u8,
}

impl MoveRequest {
    /// Builds a strict move from the loosely typed wire payload.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] when `position` is not an
    /// integer that fits in a `u8`.
    pub fn parse(room: SessionId, position: &RawPosition) -> Result<Self, ProtocolError> {
        Ok(Self {
            room,
            position: position.to_index()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An event sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// You have been paired. Sent individually to each participant.
    MatchFound(MatchFound),

    /// A move was accepted. Broadcast to both participants.
    GameUpdate(GameUpdate),

    /// Your opponent left; the session is gone.
    PlayerDisconnected,

    /// Your move was not applied. Only sent when the lobby is configured
    /// to report rejections.
    MoveRejected { reason: String },
}

/// Payload of [`ServerEvent::MatchFound`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFound {
    /// Session id to send moves to.
    pub room: SessionId,
    /// The starting board.
    pub board: Board,
    /// The side that moves next.
    pub turn_side: Side,
    /// The recipient's own side.
    pub assigned_side: Side,
}

/// Payload of [`ServerEvent::GameUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub board: Board,
    /// The side to move. After a win this is still the winner's side.
    pub turn_side: Side,
    pub outcome: Outcome,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EMPTY_BOARD;

    fn decode(json: &str) -> ClientEvent {
        serde_json::from_str(json).unwrap()
    }

    // =====================================================================
    // Inbound shapes
    // =====================================================================

    #[test]
    fn test_join_game_json_format() {
        let event = decode(r#"{"event":"joinGame","data":{"choice":"Second"}}"#);
        assert_eq!(
            event,
            ClientEvent::JoinGame {
                choice: Preference::Second
            }
        );
    }

    #[test]
    fn test_join_game_legacy_choice() {
        let event = decode(r#"{"event":"joinGame","data":{"choice":"R"}}"#);
        assert_eq!(
            event,
            ClientEvent::JoinGame {
                choice: Preference::EitherRandom
            }
        );
    }

    #[test]
    fn test_make_move_accepts_number_float_and_string_positions() {
        for raw in ["4", "4.0", "\"4\"", "\" 4 \""] {
            let json =
                format!(r#"{{"event":"makeMove","data":{{"room":"game-1-2","position":{raw}}}}}"#);
            let ClientEvent::MakeMove { room, position } = decode(&json) else {
                panic!("expected MakeMove for {raw}");
            };
            let request = MoveRequest::parse(room, &position).unwrap();
            assert_eq!(request.room, SessionId::from("game-1-2"));
            assert_eq!(request.position, 4, "{raw}");
        }
    }

    #[test]
    fn test_make_move_missing_position_fails_to_decode() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"makeMove","data":{"room":"game-1-2"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_event_fails_to_decode() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"spectate","data":{}}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // Position coercion
    // =====================================================================

    #[test]
    fn test_to_index_rejects_negative() {
        assert!(RawPosition::Integer(-1).to_index().is_err());
        assert!(RawPosition::Float(-2.0).to_index().is_err());
    }

    #[test]
    fn test_to_index_rejects_fractional_and_non_finite() {
        assert!(RawPosition::Float(4.5).to_index().is_err());
        assert!(RawPosition::Float(f64::NAN).to_index().is_err());
        assert!(RawPosition::Float(f64::INFINITY).to_index().is_err());
    }

    #[test]
    fn test_to_index_rejects_non_numeric_text() {
        let err = RawPosition::Text("top-left".into()).to_index().unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_to_index_rejects_values_beyond_u8() {
        assert!(RawPosition::Integer(256).to_index().is_err());
        assert!(RawPosition::Text("1000".into()).to_index().is_err());
    }

    #[test]
    fn test_to_index_passes_off_board_u8_through() {
        // Board bounds are the engine's job.
        assert_eq!(RawPosition::Integer(9).to_index().unwrap(), 9);
    }

    // =====================================================================
    // Outbound shapes
    // =====================================================================

    #[test]
    fn test_match_found_json_format() {
        let event = ServerEvent::MatchFound(MatchFound {
            room: SessionId::from("game-2-1"),
            board: EMPTY_BOARD,
            turn_side: Side::First,
            assigned_side: Side::Second,
        });
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "matchFound");
        assert_eq!(json["data"]["room"], "game-2-1");
        assert_eq!(json["data"]["turnSide"], "First");
        assert_eq!(json["data"]["assignedSide"], "Second");
        assert_eq!(json["data"]["board"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_game_update_json_format() {
        let mut board = EMPTY_BOARD;
        board[0] = Some(Side::First);
        let event = ServerEvent::GameUpdate(GameUpdate {
            board,
            turn_side: Side::Second,
            outcome: Outcome::InProgress,
        });
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "gameUpdate");
        assert_eq!(json["data"]["board"][0], "First");
        assert!(json["data"]["board"][1].is_null());
        assert_eq!(json["data"]["turnSide"], "Second");
        assert_eq!(json["data"]["outcome"]["state"], "InProgress");
    }

    #[test]
    fn test_player_disconnected_has_no_data() {
        let json = serde_json::to_value(ServerEvent::PlayerDisconnected).unwrap();
        assert_eq!(json, serde_json::json!({"event": "playerDisconnected"}));
    }

    #[test]
    fn test_move_rejected_json_format() {
        let json = serde_json::to_value(ServerEvent::MoveRejected {
            reason: "cell 4 is occupied".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "moveRejected");
        assert_eq!(json["data"]["reason"], "cell 4 is occupied");
    }
}
