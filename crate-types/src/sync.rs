use serde::{Deserialize, Serialize};

use crate::{Inquiry, InquiryId, ListingId, Message, Thread, ThreadId, Time, UserId};

/// Change events published on the server-wide bus. Every write goes through
/// exactly one of these, so live queries can be rebuilt from a snapshot plus
/// a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessageSync {
    ThreadCreate {
        thread: Thread,
    },

    ThreadUpdate {
        thread: Thread,
    },

    /// read receipt update
    ThreadAck {
        thread_id: ThreadId,
        user_id: UserId,
        at: Time,
    },

    MessageCreate {
        message: Message,
    },

    InquiryCreate {
        inquiry: Inquiry,
    },

    InquiryDelete {
        listing_id: ListingId,
        inquiry_id: InquiryId,
    },
}
