//! Wire protocol for Matchboard.
//!
//! This crate defines the vocabulary every other layer shares:
//!
//! - **Types** ([`PlayerId`], [`SessionId`], [`Side`], [`Preference`],
//!   [`Board`], [`Outcome`]): identities and game values.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): the named messages
//!   that travel over a connection, plus [`MoveRequest`], the strict move
//!   shape produced at the boundary.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Lobby (queues, sessions, games)
//! ```

mod codec;
mod error;
mod event;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use event::{ClientEvent, GameUpdate, MatchFound, MoveRequest, RawPosition, ServerEvent};
pub use types::{Board, EMPTY_BOARD, Outcome, PlayerId, Preference, SessionId, Side};
