use types::{ListingId, ThreadId, UserId};

/// store-facing payload for creating a thread
#[derive(Debug, Clone)]
pub struct DbThreadCreate {
    pub listing_id: ListingId,
    pub creator_id: UserId,
    pub other_id: UserId,
}

/// store-facing payload for appending a message; the store assigns id and
/// timestamp at commit time
#[derive(Debug, Clone)]
pub struct DbMessageCreate {
    pub thread_id: ThreadId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_email: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct DbInquiryCreate {
    pub listing_id: ListingId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_email: String,
    pub content: String,
}
