//! The matchmaker: queues players, pairs them, and routes their moves.

use std::collections::HashMap;

use matchboard_protocol::{
    ClientEvent, MoveRequest, PlayerId, Preference, ServerEvent, SessionId, Side,
};

use crate::{LobbyConfig, LobbyError, Player, Session, WaitQueue, find_opponent};

/// Events to deliver after an operation, addressed one player at a time.
///
/// Returned in the order they must be sent.
pub type Outbox = Vec<(PlayerId, ServerEvent)>;

/// Owns every waiting player and every live session.
///
/// A player is in at most one place at a time: one queue lane, or one
/// session. Joining while seated leaves the session first.
///
/// `Matchmaker` is not thread-safe on its own. The server keeps a single
/// instance behind a mutex and applies one event at a time.
pub struct Matchmaker {
    config: LobbyConfig,
    queue: WaitQueue,

    /// Live sessions, keyed by session id.
    sessions: HashMap<SessionId, Session>,

    /// Which session each seated player is in. Holds exactly the
    /// participants of `sessions`; updated whenever a session is created
    /// or torn down.
    player_sessions: HashMap<PlayerId, SessionId>,

    /// Pairings made so far. Feeds the session id, so a repeat pairing of
    /// the same two players never reuses an old id.
    pairings: u64,
}

impl Matchmaker {
    /// Creates an empty matchmaker.
    pub fn new(config: LobbyConfig) -> Self {
        Self {
            config,
            queue: WaitQueue::new(),
            sessions: HashMap::new(),
            player_sessions: HashMap::new(),
            pairings: 0,
        }
    }

    /// Applies one decoded client event.
    ///
    /// Malformed or illegal moves are dropped here; the caller only has to
    /// deliver the returned events.
    pub fn handle_event(&mut self, player_id: PlayerId, event: ClientEvent) -> Outbox {
        match event {
            ClientEvent::JoinGame { choice } => self.join(player_id, choice),
            ClientEvent::MakeMove { room, position } => {
                match MoveRequest::parse(room, &position) {
                    Ok(request) => self.handle_move(player_id, request),
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "malformed move ignored");
                        self.rejection(player_id, e.to_string())
                    }
                }
            }
        }
    }

    /// Puts `player_id` in the queue with `preference` and tries to pair
    /// them right away.
    ///
    /// Any earlier queue entry is replaced. A player still seated in a
    /// session leaves it, and the other participant is told.
    pub fn join(&mut self, player_id: PlayerId, preference: Preference) -> Outbox {
        let mut outbox = self.leave_session(player_id);

        self.queue.enqueue(Player {
            id: player_id,
            preference,
        });
        tracing::info!(
            %player_id,
            %preference,
            waiting = self.queue.len(),
            "player queued"
        );

        outbox.extend(self.attempt_pairing(player_id));
        outbox
    }

    /// Forgets `player_id` entirely: out of the queue, and out of any
    /// session (the other participant gets `playerDisconnected`).
    ///
    /// Safe to call for unknown players and safe to call twice.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Outbox {
        if let Some(preference) = self.queue.remove(player_id) {
            tracing::info!(%player_id, %preference, "waiting player left");
        }
        self.leave_session(player_id)
    }

    /// Applies a move and returns the `gameUpdate` broadcast.
    ///
    /// # Errors
    /// - [`LobbyError::UnknownSession`]: no such live session
    /// - [`LobbyError::NotParticipant`] / [`LobbyError::NotYourTurn`]:
    ///   only with `strict_turns`
    /// - [`LobbyError::Move`]: the game rejected the move
    ///
    /// On error nothing changes.
    pub fn make_move(
        &mut self,
        player_id: PlayerId,
        request: MoveRequest,
    ) -> Result<Outbox, LobbyError> {
        let session = self
            .sessions
            .get_mut(&request.room)
            .ok_or_else(|| LobbyError::UnknownSession(request.room.clone()))?;

        if self.config.strict_turns {
            let side = session.side_of(player_id).ok_or_else(|| {
                LobbyError::NotParticipant {
                    player: player_id,
                    session: request.room.clone(),
                }
            })?;
            let game = session.game();
            // A finished game reports GameOver, not a turn error.
            if !game.outcome().is_terminal() && game.turn() != side {
                return Err(LobbyError::NotYourTurn(player_id));
            }
        }

        let outcome = session.game_mut().make_move(request.position)?;
        if outcome.is_terminal() {
            tracing::info!(session_id = %session.id(), %outcome, "game finished");
        }

        let update = ServerEvent::GameUpdate(session.game().snapshot());
        Ok(session
            .members()
            .into_iter()
            .map(|member| (member, update.clone()))
            .collect())
    }

    /// [`make_move`](Self::make_move), with rejections logged and dropped
    /// (or reported to the mover, if configured).
    pub fn handle_move(&mut self, player_id: PlayerId, request: MoveRequest) -> Outbox {
        match self.make_move(player_id, request) {
            Ok(outbox) => outbox,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "move ignored");
                self.rejection(player_id, e.to_string())
            }
        }
    }

    // -- Queries ----------------------------------------------------------

    /// Returns `true` if the player is waiting in any lane.
    pub fn is_waiting(&self, player_id: PlayerId) -> bool {
        self.queue.contains(player_id)
    }

    /// Total number of waiting players.
    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.queue
    }

    /// The session `player_id` is seated in, if any.
    pub fn session_of(&self, player_id: PlayerId) -> Option<&SessionId> {
        self.player_sessions.get(&player_id)
    }

    pub fn session(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // -- Internals --------------------------------------------------------

    /// Pairs a freshly queued player if the rule finds an opponent.
    fn attempt_pairing(&mut self, requester: PlayerId) -> Outbox {
        let Some(preference) = self.queue.preference_of(requester) else {
            return Vec::new();
        };
        let player = Player {
            id: requester,
            preference,
        };
        let Some(pairing) =
            find_opponent(&self.queue, player, self.config.random_pairing_threshold)
        else {
            tracing::debug!(%requester, %preference, "no opponent yet");
            return Vec::new();
        };

        self.queue.remove(requester);
        self.queue.remove(pairing.opponent);

        self.pairings += 1;
        let session = Session::from_pairing(self.pairings, requester, pairing);
        let session_id = session.id().clone();
        tracing::info!(
            %session_id,
            first = %session.player_on(Side::First),
            second = %session.player_on(Side::Second),
            "session created"
        );

        let outbox = session
            .participants()
            .iter()
            .map(|&(member, side)| {
                (member, ServerEvent::MatchFound(session.match_found(side)))
            })
            .collect();

        for member in session.members() {
            self.player_sessions.insert(member, session_id.clone());
        }
        self.sessions.insert(session_id, session);
        outbox
    }

    /// Tears down the session `player_id` is seated in, if any, and tells
    /// the other participant.
    fn leave_session(&mut self, player_id: PlayerId) -> Outbox {
        let Some(session_id) = self.player_sessions.remove(&player_id) else {
            return Vec::new();
        };
        let Some(session) = self.sessions.remove(&session_id) else {
            return Vec::new();
        };

        let mut outbox = Vec::new();
        for member in session.members() {
            if member != player_id {
                self.player_sessions.remove(&member);
                outbox.push((member, ServerEvent::PlayerDisconnected));
            }
        }

        tracing::info!(
            %session_id,
            %player_id,
            outcome = %session.game().outcome(),
            "session closed"
        );
        outbox
    }

    fn rejection(&self, player_id: PlayerId, reason: String) -> Outbox {
        if self.config.report_rejections {
            vec![(player_id, ServerEvent::MoveRejected { reason })]
        } else {
            Vec::new()
        }
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new(LobbyConfig::default())
    }
}
