//! Unified error type for Matchboard.

use matchboard_protocol::ProtocolError;
use matchboard_transport::TransportError;

/// Errors that end a connection handler.
///
/// Lobby and game rejections never reach this type: the matchmaker logs
/// and drops them (or reports them to the mover) without closing the
/// connection.
#[derive(Debug, thiserror::Error)]
pub enum MatchboardError {
    /// Binding, accepting, or talking to a socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An event could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::other("gone"));
        let top: MatchboardError = err.into();
        assert!(matches!(top, MatchboardError::Transport(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: MatchboardError = err.into();
        assert!(matches!(top, MatchboardError::Protocol(_)));
        assert!(top.to_string().contains("bad"));
    }

    #[test]
    fn test_handshake_timeout_is_a_transport_error() {
        let err = TransportError::HandshakeTimedOut(std::time::Duration::from_millis(100));
        let top: MatchboardError = err.into();
        assert!(matches!(
            top,
            MatchboardError::Transport(TransportError::HandshakeTimedOut(_))
        ));
    }
}
