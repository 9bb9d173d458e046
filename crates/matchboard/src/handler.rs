//! Per-connection handler: event decoding and delivery.
//!
//! Each accepted socket gets its own Tokio task running this handler.
//! The flow is:
//!   1. Complete the WebSocket upgrade (bounded by the handshake timeout)
//!   2. Register an outbound channel and spawn the writer task
//!   3. Loop: receive frames → decode `ClientEvent` → apply to the lobby
//!   4. On exit, close the socket; the guard disconnects the player

use std::sync::Arc;

use matchboard_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use matchboard_transport::{Connection, Handshake, PendingWebSocket, WebSocketConnection};
use tokio::sync::mpsc;

use crate::MatchboardError;
use crate::server::ServerState;

/// Drop guard that disconnects a player when the handler exits.
///
/// Runs even if the handler panics. `Drop` is synchronous, so the async
/// cleanup is spawned as a fire-and-forget task.
struct PlayerGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for PlayerGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.disconnect(player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
///
/// # Errors
/// Returns [`MatchboardError::Transport`] if the handshake fails or times
/// out. Read errors after that end the connection normally.
pub(crate) async fn handle_connection<C: Codec>(
    pending: PendingWebSocket,
    state: Arc<ServerState<C>>,
) -> Result<(), MatchboardError> {
    let peer = pending.peer_addr();
    let conn = Arc::new(pending.complete().await.inspect_err(|e| {
        tracing::debug!(%peer, error = %e, "handshake failed");
    })?);
    let conn_id = conn.id();
    let player_id = PlayerId::from(conn_id);
    tracing::info!(%conn_id, %player_id, "player connected");

    let (tx, rx) = mpsc::unbounded_channel();
    state.clients.lock().await.insert(player_id, tx);
    let _guard = PlayerGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let writer = {
        let conn = Arc::clone(&conn);
        let state = Arc::clone(&state);
        async move {
            if let Err(e) = write_events(&conn, &state, rx).await {
                tracing::debug!(%player_id, error = %e, "writer stopped");
            }
        }
    };
    tokio::spawn(writer);

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "undecodable frame ignored");
                continue;
            }
        };

        state.dispatch(player_id, event).await;
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(%player_id, error = %e, "close after read loop failed");
    }

    // _guard drops here → disconnect fires, the sender is dropped, and the
    // writer task drains and exits.
    Ok(())
}

/// Encodes queued events and writes them to the socket, in order.
///
/// Returns `Ok` once the player's sender is dropped; an encode or send
/// failure stops the writer.
async fn write_events<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
) -> Result<(), MatchboardError> {
    while let Some(event) = rx.recv().await {
        let bytes = state.codec.encode(&event)?;
        conn.send(&bytes).await?;
    }
    Ok(())
}
