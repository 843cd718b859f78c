use serde::{Deserialize, Serialize};

use crate::{InquiryId, ListingId, Time, UserId};

/// A contact message left on a listing, outside any chat thread. Unlike chat
/// messages these may be deleted again, but only by their sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub listing_id: ListingId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sender_email: String,
    pub content: String,
    pub created_at: Time,
}
