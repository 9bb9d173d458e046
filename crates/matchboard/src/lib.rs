//! # Matchboard
//!
//! A WebSocket matchmaking server for two-player tic-tac-toe.
//!
//! Clients connect, announce the side they want with `joinGame`, and are
//! paired with a compatible waiting player. Each pair gets a session with
//! its own board; moves are validated on the server and every accepted move
//! is broadcast to both players.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchboard::prelude::*;
//!
//! # async fn run() -> Result<(), MatchboardError> {
//! let server = MatchboardServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .lobby_config(LobbyConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::MatchboardError;
pub use server::{MatchboardServer, MatchboardServerBuilder};

pub use matchboard_game as game;
pub use matchboard_lobby as lobby;
pub use matchboard_protocol as protocol;
pub use matchboard_transport as transport;

/// Everything needed to embed a server.
pub mod prelude {
    pub use crate::{MatchboardError, MatchboardServer, MatchboardServerBuilder};
    pub use matchboard_lobby::LobbyConfig;
    pub use matchboard_protocol::{
        ClientEvent, Outcome, PlayerId, Preference, ServerEvent, SessionId, Side,
    };
}
