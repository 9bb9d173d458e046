//! `MatchboardServer` builder and server loop.
//!
//! This is the entry point for running a Matchboard server. It ties
//! together the layers: transport → protocol → lobby.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use matchboard_lobby::{LobbyConfig, Matchmaker, Outbox};
use matchboard_protocol::{ClientEvent, Codec, JsonCodec, PlayerId, ServerEvent};
use matchboard_transport::{DEFAULT_HANDSHAKE_TIMEOUT, Transport, WebSocketTransport};
use tokio::sync::{Mutex, mpsc};

use crate::MatchboardError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Lock order is `matchmaker` then `clients`. Events are queued to the
/// writers while the matchmaker lock is still held, so every player sees
/// events in the order the matchmaker produced them.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) matchmaker: Mutex<Matchmaker>,
    pub(crate) clients: Mutex<HashMap<PlayerId, mpsc::UnboundedSender<ServerEvent>>>,
    pub(crate) codec: C,
}

impl<C: Codec> ServerState<C> {
    pub(crate) fn new(config: LobbyConfig, codec: C) -> Self {
        Self {
            matchmaker: Mutex::new(Matchmaker::new(config)),
            clients: Mutex::new(HashMap::new()),
            codec,
        }
    }

    /// Applies one client event and delivers what it produced.
    pub(crate) async fn dispatch(&self, player_id: PlayerId, event: ClientEvent) {
        let mut matchmaker = self.matchmaker.lock().await;
        let outbox = matchmaker.handle_event(player_id, event);
        self.deliver(outbox).await;
    }

    /// Removes a player from the lobby and tells whoever needs to know.
    pub(crate) async fn disconnect(&self, player_id: PlayerId) {
        let mut matchmaker = self.matchmaker.lock().await;
        self.clients.lock().await.remove(&player_id);
        let outbox = matchmaker.disconnect(player_id);
        self.deliver(outbox).await;
    }

    /// Queues each event on its recipient's writer. Recipients that have
    /// already gone are skipped.
    async fn deliver(&self, outbox: Outbox) {
        if outbox.is_empty() {
            return;
        }
        let clients = self.clients.lock().await;
        for (recipient, event) in outbox {
            match clients.get(&recipient) {
                Some(tx) => {
                    if tx.send(event).is_err() {
                        tracing::debug!(%recipient, "writer closed, event dropped");
                    }
                }
                None => {
                    tracing::debug!(%recipient, "recipient not connected, event dropped");
                }
            }
        }
    }
}

/// Builder for configuring and starting a Matchboard server.
///
/// # Example
///
/// ```rust,ignore
/// use matchboard::prelude::*;
///
/// let server = MatchboardServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct MatchboardServerBuilder {
    bind_addr: String,
    lobby_config: LobbyConfig,
    handshake_timeout: Duration,
}

impl MatchboardServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            lobby_config: LobbyConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the lobby configuration.
    pub fn lobby_config(mut self, config: LobbyConfig) -> Self {
        self.lobby_config = config;
        self
    }

    /// Sets how long a new socket has to complete the WebSocket upgrade
    /// before it is dropped.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<MatchboardServer<JsonCodec>, MatchboardError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_handshake_timeout(self.handshake_timeout);
        tracing::debug!(config = ?self.lobby_config, "lobby configured");

        Ok(MatchboardServer {
            transport,
            state: Arc::new(ServerState::new(self.lobby_config, JsonCodec)),
        })
    }
}

impl Default for MatchboardServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Matchboard server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MatchboardServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl MatchboardServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> MatchboardServerBuilder {
        MatchboardServerBuilder::new()
    }
}

impl<C: Codec> MatchboardServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted socket; the WebSocket
    /// upgrade happens inside that task. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), MatchboardError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "matchboard server listening"),
            Err(_) => tracing::info!("matchboard server listening"),
        }

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchboard_protocol::{Preference, SessionId};

    async fn register(
        state: &ServerState<JsonCodec>,
        id: u64,
    ) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        state.clients.lock().await.insert(PlayerId(id), tx);
        rx
    }

    fn join(choice: Preference) -> ClientEvent {
        ClientEvent::JoinGame { choice }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_match_found_to_both() {
        let state = ServerState::new(LobbyConfig::default(), JsonCodec);
        let mut rx1 = register(&state, 1).await;
        let mut rx2 = register(&state, 2).await;

        state.dispatch(PlayerId(1), join(Preference::First)).await;
        assert!(rx1.try_recv().is_err());

        state.dispatch(PlayerId(2), join(Preference::Second)).await;
        for rx in [&mut rx1, &mut rx2] {
            match rx.try_recv() {
                Ok(ServerEvent::MatchFound(found)) => {
                    assert_eq!(found.room, SessionId::from("game-1-2-1"));
                }
                other => panic!("expected matchFound, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_and_notifies_opponent() {
        let state = ServerState::new(LobbyConfig::default(), JsonCodec);
        let mut rx1 = register(&state, 1).await;
        let _rx2 = register(&state, 2).await;
        state.dispatch(PlayerId(1), join(Preference::First)).await;
        state.dispatch(PlayerId(2), join(Preference::Second)).await;
        let _ = rx1.try_recv();

        state.disconnect(PlayerId(2)).await;
        assert_eq!(rx1.try_recv().ok(), Some(ServerEvent::PlayerDisconnected));
        assert!(!state.clients.lock().await.contains_key(&PlayerId(2)));
    }

    #[tokio::test]
    async fn test_deliver_skips_unknown_recipients() {
        let state = ServerState::new(LobbyConfig::default(), JsonCodec);
        state
            .deliver(vec![(PlayerId(9), ServerEvent::PlayerDisconnected)])
            .await;
    }

    #[tokio::test]
    async fn test_builder_binds_ephemeral_port() {
        let server = MatchboardServer::builder()
            .bind("127.0.0.1:0")
            .build()
            .await
            .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }
}
