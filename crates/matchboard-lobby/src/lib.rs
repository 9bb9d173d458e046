//! Matchmaking and session lifecycle for Matchboard.
//!
//! Everything here is synchronous and owned by a single [`Matchmaker`].
//! The server wraps it in one mutex, so each event (a join, a move, a
//! disconnect) is applied as one indivisible step. Operations return the
//! events to deliver instead of sending them, which keeps the whole lobby
//! testable without a network.
//!
//! # Key types
//!
//! - [`Matchmaker`]: queues, sessions, and the player → session index
//! - [`WaitQueue`]: three FIFO lanes keyed by [`Preference`]
//! - [`find_opponent`]: the pairing rule
//! - [`Session`]: two seated players and their game
//! - [`LobbyConfig`]: turn enforcement and rejection reporting
//!
//! [`Preference`]: matchboard_protocol::Preference

mod config;
mod error;
mod matchmaker;
mod pairing;
mod queue;
mod session;

pub use config::LobbyConfig;
pub use error::LobbyError;
pub use matchmaker::{Matchmaker, Outbox};
pub use pairing::{Pairing, find_opponent};
pub use queue::{Player, WaitQueue};
pub use session::Session;
