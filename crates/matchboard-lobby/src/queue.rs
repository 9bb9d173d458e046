//! The waiting queue: three FIFO lanes, one per side preference.

use std::collections::VecDeque;

use matchboard_protocol::{PlayerId, Preference};

/// A player waiting to be paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub preference: Preference,
}

/// Players waiting for an opponent, partitioned by preference.
///
/// Within a lane, insertion order is pairing order. A player is in at
/// most one lane at a time: [`enqueue`](Self::enqueue) removes any earlier
/// entry before adding the new one.
#[derive(Debug, Default)]
pub struct WaitQueue {
    first: VecDeque<PlayerId>,
    second: VecDeque<PlayerId>,
    random: VecDeque<PlayerId>,
}

impl WaitQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lane(&self, preference: Preference) -> &VecDeque<PlayerId> {
        match preference {
            Preference::First => &self.first,
            Preference::Second => &self.second,
            Preference::EitherRandom => &self.random,
        }
    }

    fn lane_mut(&mut self, preference: Preference) -> &mut VecDeque<PlayerId> {
        match preference {
            Preference::First => &mut self.first,
            Preference::Second => &mut self.second,
            Preference::EitherRandom => &mut self.random,
        }
    }

    /// Appends `player` to the tail of its lane, dropping any earlier
    /// entry for the same id (in any lane) first.
    pub fn enqueue(&mut self, player: Player) {
        self.remove(player.id);
        self.lane_mut(player.preference).push_back(player.id);
    }

    /// Removes `id` from every lane. Returns the lane it was in, or `None`
    /// if it was not waiting.
    pub fn remove(&mut self, id: PlayerId) -> Option<Preference> {
        let mut found = None;
        for preference in Preference::ALL {
            let lane = self.lane_mut(preference);
            let before = lane.len();
            lane.retain(|waiting| *waiting != id);
            if lane.len() != before {
                found = Some(preference);
            }
        }
        found
    }

    /// The lane `id` is waiting in, if any.
    pub fn preference_of(&self, id: PlayerId) -> Option<Preference> {
        Preference::ALL
            .into_iter()
            .find(|&preference| self.lane(preference).contains(&id))
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.preference_of(id).is_some()
    }

    /// The earliest-enqueued player in a lane other than `excluded`.
    pub fn head_excluding(
        &self,
        preference: Preference,
        excluded: PlayerId,
    ) -> Option<PlayerId> {
        self.lane(preference)
            .iter()
            .copied()
            .find(|&id| id != excluded)
    }

    /// Number of players waiting in one lane.
    pub fn lane_len(&self, preference: Preference) -> usize {
        self.lane(preference).len()
    }

    /// Players waiting in one lane, head first.
    pub fn waiting(&self, preference: Preference) -> impl Iterator<Item = PlayerId> + '_ {
        self.lane(preference).iter().copied()
    }

    /// Total number of waiting players.
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len() + self.random.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
