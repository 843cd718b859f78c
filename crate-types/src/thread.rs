use serde::{Deserialize, Serialize};

use crate::{ListingId, ThreadId, Time, UserId};

/// A chat conversation scoped to exactly one listing and exactly two
/// participants. At most one thread exists per (listing, participant pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub listing_id: ListingId,

    /// unordered pair, no duplicates
    pub participant_ids: [UserId; 2],

    pub created_at: Time,

    /// bumped to the newest message's timestamp, never moves backwards
    pub last_message_at: Time,
}

impl Thread {
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participant_ids.contains(&user_id)
    }

    /// the participant that isn't `user_id`, if `user_id` is in the pair
    pub fn other_participant(&self, user_id: UserId) -> Option<UserId> {
        let [a, b] = self.participant_ids;
        if a == user_id {
            Some(b)
        } else if b == user_id {
            Some(a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::Thread;
    use crate::{ListingId, ThreadId, Time, UserId};

    fn thread(a: UserId, b: UserId) -> Thread {
        let now = Time::now_utc();
        Thread {
            id: ThreadId::new(),
            listing_id: ListingId::new(),
            participant_ids: [a, b],
            created_at: now,
            last_message_at: now,
        }
    }

    #[test]
    fn other_participant_is_symmetric() {
        let a = UserId::new();
        let b = UserId::new();
        let t = thread(a, b);
        assert_eq!(t.other_participant(a), Some(b));
        assert_eq!(t.other_participant(b), Some(a));
        assert_eq!(t.other_participant(UserId::new()), None);
    }
}
