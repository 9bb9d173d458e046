//! The pairing rule.
//!
//! | Requester      | Opponent search order                          | Requester side |
//! |----------------|------------------------------------------------|----------------|
//! | `First`        | Second lane, then EitherRandom lane             | First          |
//! | `Second`       | First lane, then EitherRandom lane              | Second         |
//! | `EitherRandom` | First lane, Second lane, then EitherRandom lane | opposite of the opponent's stated side; First against another EitherRandom |
//!
//! The EitherRandom lane is only searched for an EitherRandom requester when
//! at least `random_threshold` other players wait in it. The first match
//! wins and the head of a lane is always taken, so the result depends only
//! on the queue contents.

use matchboard_protocol::{PlayerId, Preference, Side};

use crate::{Player, WaitQueue};

/// An opponent and the seats both players get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub opponent: PlayerId,
    pub requester_side: Side,
    pub opponent_side: Side,
}

impl Pairing {
    fn seat(opponent: PlayerId, requester_side: Side) -> Self {
        Self {
            opponent,
            requester_side,
            opponent_side: requester_side.opponent(),
        }
    }
}

/// Picks an opponent for `requester` from `queue`, or `None` if nobody
/// eligible is waiting.
///
/// `requester` may already be in the queue; it is never chosen as its
/// own opponent and never counted toward `random_threshold`.
pub fn find_opponent(
    queue: &WaitQueue,
    requester: Player,
    random_threshold: usize,
) -> Option<Pairing> {
    let head = |preference| queue.head_excluding(preference, requester.id);

    match requester.preference {
        Preference::First => head(Preference::Second)
            .or_else(|| head(Preference::EitherRandom))
            .map(|opponent| Pairing::seat(opponent, Side::First)),

        Preference::Second => head(Preference::First)
            .or_else(|| head(Preference::EitherRandom))
            .map(|opponent| Pairing::seat(opponent, Side::Second)),

        Preference::EitherRandom => {
            if let Some(opponent) = head(Preference::First) {
                return Some(Pairing::seat(opponent, Side::Second));
            }
            if let Some(opponent) = head(Preference::Second) {
                return Some(Pairing::seat(opponent, Side::First));
            }
            let others = queue
                .waiting(Preference::EitherRandom)
                .filter(|&id| id != requester.id)
                .count();
            if others >= random_threshold {
                head(Preference::EitherRandom)
                    .map(|opponent| Pairing::seat(opponent, Side::First))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: usize = 2;

    fn queue_of(players: &[(u64, Preference)]) -> WaitQueue {
        let mut queue = WaitQueue::new();
        for &(id, preference) in players {
            queue.enqueue(Player {
                id: PlayerId(id),
                preference,
            });
        }
        queue
    }

    /// Enqueues the requester (as `join` does) and searches.
    fn arrive(queue: &mut WaitQueue, id: u64, preference: Preference) -> Option<Pairing> {
        let requester = Player {
            id: PlayerId(id),
            preference,
        };
        queue.enqueue(requester);
        find_opponent(queue, requester, THRESHOLD)
    }

    #[test]
    fn test_first_prefers_second_lane_over_random() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom), (2, Preference::Second)]);
        let pairing = arrive(&mut queue, 9, Preference::First).unwrap();
        assert_eq!(pairing.opponent, PlayerId(2));
        assert_eq!(pairing.requester_side, Side::First);
        assert_eq!(pairing.opponent_side, Side::Second);
    }

    #[test]
    fn test_first_falls_back_to_random_lane() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom)]);
        let pairing = arrive(&mut queue, 9, Preference::First).unwrap();
        assert_eq!(pairing.opponent, PlayerId(1));
        assert_eq!(pairing.opponent_side, Side::Second);
    }

    #[test]
    fn test_first_ignores_other_first_players() {
        let mut queue = queue_of(&[(1, Preference::First)]);
        assert_eq!(arrive(&mut queue, 9, Preference::First), None);
    }

    #[test]
    fn test_second_prefers_first_lane_over_random() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom), (2, Preference::First)]);
        let pairing = arrive(&mut queue, 9, Preference::Second).unwrap();
        assert_eq!(pairing.opponent, PlayerId(2));
        assert_eq!(pairing.requester_side, Side::Second);
        assert_eq!(pairing.opponent_side, Side::First);
    }

    #[test]
    fn test_second_falls_back_to_random_lane() {
        let mut queue = queue_of(&[(4, Preference::EitherRandom)]);
        let pairing = arrive(&mut queue, 9, Preference::Second).unwrap();
        assert_eq!(pairing.opponent, PlayerId(4));
        assert_eq!(pairing.opponent_side, Side::First);
    }

    #[test]
    fn test_random_takes_first_lane_and_plays_second() {
        let mut queue = queue_of(&[(2, Preference::Second), (1, Preference::First)]);
        let pairing = arrive(&mut queue, 9, Preference::EitherRandom).unwrap();
        assert_eq!(pairing.opponent, PlayerId(1));
        assert_eq!(pairing.requester_side, Side::Second);
        assert_eq!(pairing.opponent_side, Side::First);
    }

    #[test]
    fn test_random_takes_second_lane_and_plays_first() {
        let mut queue = queue_of(&[(2, Preference::Second)]);
        let pairing = arrive(&mut queue, 9, Preference::EitherRandom).unwrap();
        assert_eq!(pairing.opponent, PlayerId(2));
        assert_eq!(pairing.requester_side, Side::First);
        assert_eq!(pairing.opponent_side, Side::Second);
    }

    #[test]
    fn test_random_does_not_pair_with_lone_random_waiter() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom)]);
        assert_eq!(arrive(&mut queue, 9, Preference::EitherRandom), None);
    }

    #[test]
    fn test_random_pairs_with_random_head_once_two_others_wait() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom), (2, Preference::EitherRandom)]);
        let pairing = arrive(&mut queue, 9, Preference::EitherRandom).unwrap();
        assert_eq!(pairing.opponent, PlayerId(1));
        assert_eq!(pairing.requester_side, Side::First);
        assert_eq!(pairing.opponent_side, Side::Second);
    }

    #[test]
    fn test_random_threshold_is_configurable() {
        let mut queue = queue_of(&[(1, Preference::EitherRandom)]);
        let requester = Player {
            id: PlayerId(9),
            preference: Preference::EitherRandom,
        };
        queue.enqueue(requester);
        let pairing = find_opponent(&queue, requester, 1).unwrap();
        assert_eq!(pairing.opponent, PlayerId(1));
    }

    #[test]
    fn test_empty_queue_has_no_opponent() {
        let mut queue = WaitQueue::new();
        for preference in Preference::ALL {
            assert_eq!(arrive(&mut queue, 9, preference), None);
        }
    }

    #[test]
    fn test_pairing_is_deterministic() {
        let waiting = [
            (1, Preference::EitherRandom),
            (2, Preference::Second),
            (3, Preference::First),
            (4, Preference::Second),
        ];
        for preference in Preference::ALL {
            let first = arrive(&mut queue_of(&waiting), 9, preference);
            let again = arrive(&mut queue_of(&waiting), 9, preference);
            assert_eq!(first, again, "{preference}");
        }
    }

    #[test]
    fn test_sides_are_always_complementary() {
        let waiting = [
            (1, Preference::EitherRandom),
            (2, Preference::EitherRandom),
            (3, Preference::Second),
            (4, Preference::First),
        ];
        for preference in Preference::ALL {
            let pairing = arrive(&mut queue_of(&waiting), 9, preference).unwrap();
            assert_ne!(pairing.requester_side, pairing.opponent_side);
        }
    }
}
