use serde::{Deserialize, Serialize};

use crate::{MessageId, ThreadId, Time, UserId};

/// A single chat message. Messages are immutable and append-only; ordering
/// within a thread is by `created_at` ascending.
///
/// Sender name and email are copied from the sender's profile at send time
/// and never re-derived, so later profile edits don't rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_email: String,
    pub content: String,

    /// assigned by the store at commit time, strictly increasing per thread
    pub created_at: Time,
}
