//! A session: two seated players sharing one game.

use matchboard_game::Game;
use matchboard_protocol::{MatchFound, PlayerId, SessionId, Side};

use crate::Pairing;

/// Two players on complementary sides and the game between them.
///
/// Created by the [`Matchmaker`](crate::Matchmaker) when a pairing
/// succeeds; dropped when either player disconnects or re-joins the
/// queue.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    /// `[requester, opponent]` with their sides.
    participants: [(PlayerId, Side); 2],
    game: Game,
}

impl Session {
    /// Seats the requester and its chosen opponent in a fresh game.
    ///
    /// `seq` is the matchmaker's pairing number and keeps the id unique.
    pub fn from_pairing(seq: u64, requester: PlayerId, pairing: Pairing) -> Self {
        debug_assert_ne!(pairing.requester_side, pairing.opponent_side);
        Self {
            id: SessionId::for_pair(seq, requester, pairing.opponent),
            participants: [
                (requester, pairing.requester_side),
                (pairing.opponent, pairing.opponent_side),
            ],
            game: Game::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn participants(&self) -> &[(PlayerId, Side); 2] {
        &self.participants
    }

    /// Both players, requester first.
    pub fn members(&self) -> [PlayerId; 2] {
        [self.participants[0].0, self.participants[1].0]
    }

    /// The side `player` is seated on, if seated here.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        self.participants
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, side)| *side)
    }

    /// The player seated on `side`.
    pub fn player_on(&self, side: Side) -> PlayerId {
        if self.participants[0].1 == side {
            self.participants[0].0
        } else {
            self.participants[1].0
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// The `matchFound` payload for one participant.
    pub fn match_found(&self, assigned_side: Side) -> MatchFound {
        MatchFound {
            room: self.id.clone(),
            board: *self.game.board(),
            turn_side: self.game.turn(),
            assigned_side,
        }
    }
}
