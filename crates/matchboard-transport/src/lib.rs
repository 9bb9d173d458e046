//! Transport layer for Matchboard.
//!
//! Provides the [`Transport`] and [`Connection`] traits that the server
//! programs against, plus the WebSocket implementation used in production.
//! A connection is a bidirectional channel of whole messages; framing and
//! event names live one layer up, in `matchboard-protocol`.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    DEFAULT_HANDSHAKE_TIMEOUT, PendingWebSocket, WebSocketConnection, WebSocketTransport,
};

use std::fmt;

/// Opaque identifier for a connection.
///
/// Identifiers are handed out from a process-wide counter and are never
/// reused, so they can double as a player's identity for the lifetime of
/// the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
///
/// Accepting is split in two: [`accept`](Self::accept) returns as soon as
/// the raw socket arrives, and [`Handshake::complete`] finishes any
/// protocol upgrade. Callers run the second step off the accept loop.
pub trait Transport: Send + Sync + 'static {
    /// An accepted socket that still needs its handshake.
    type Pending: Handshake<Connection = Self::Connection, Error = Self::Error>;
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming socket.
    async fn accept(&mut self) -> Result<Self::Pending, Self::Error>;
}

/// The second half of accepting a connection.
pub trait Handshake: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Completes the handshake, failing if it takes too long or the peer
    /// speaks the wrong protocol.
    async fn complete(self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send and receive whole messages.
///
/// Implementations must allow `send` and `recv` to run concurrently from
/// different tasks: the server parks one task in `recv` while another
/// delivers events with `send`.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one message to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
