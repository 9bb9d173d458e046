//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
///
/// Decode failures and invalid messages never reach game logic: the
/// connection handler logs them and drops the frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, unknown event name, or a
    /// payload of the wrong shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but violates protocol rules, e.g. a move
    /// position that is not a small non-negative integer.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
