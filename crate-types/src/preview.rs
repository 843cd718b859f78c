use serde::{Deserialize, Serialize};

use crate::{ListingId, ThreadId, Time, UserId};

/// Per-thread summary for a chat list, recomputed from the thread, the
/// viewer's read cursor, and the message set. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPreview {
    pub thread_id: ThreadId,
    pub listing_id: ListingId,
    pub other_user_id: UserId,
    pub last_message_at: Time,

    /// `None` means the viewer never read the thread
    pub last_read_at: Option<Time>,

    /// counterpart messages newer than the viewer's cursor
    pub unread_count: u64,
}
