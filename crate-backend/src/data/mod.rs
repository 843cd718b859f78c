use async_trait::async_trait;
use types::{
    Inquiry, InquiryId, ListingId, Message, Thread, ThreadId, Time, UserId, UserProfile,
};

use crate::error::Result;
use crate::types::{DbInquiryCreate, DbMessageCreate, DbThreadCreate};

pub mod memory;

/// The document store seam. Everything the chat core persists or queries
/// goes through this; live queries are snapshot reads re-run on change
/// events, so the store itself only needs point reads and writes.
pub trait Data:
    DataUser + DataThread + DataMessage + DataUnread + DataInquiry + Send + Sync
{
}

#[async_trait]
pub trait DataUser {
    async fn user_put(&self, user: UserProfile) -> Result<()>;
    async fn user_get(&self, user_id: UserId) -> Result<UserProfile>;
}

#[async_trait]
pub trait DataThread {
    /// create a thread; returns the existing one when the same
    /// (listing, participant pair) already has one
    async fn thread_create(&self, create: DbThreadCreate) -> Result<Thread>;
    async fn thread_get(&self, thread_id: ThreadId) -> Result<Thread>;

    /// order-independent lookup of the pair's thread for a listing
    async fn thread_find(
        &self,
        listing_id: ListingId,
        user_a_id: UserId,
        user_b_id: UserId,
    ) -> Result<Option<Thread>>;

    /// every thread `user_id` participates in, last_message_at descending
    async fn thread_list(&self, user_id: UserId) -> Result<Vec<Thread>>;

    /// bump last_message_at, which never moves backwards; returns the
    /// updated thread
    async fn thread_touch(&self, thread_id: ThreadId, at: Time) -> Result<Thread>;
}

#[async_trait]
pub trait DataMessage {
    /// append a message; the store assigns id and a timestamp strictly
    /// greater than every earlier message in the thread
    async fn message_create(&self, create: DbMessageCreate) -> Result<Message>;

    /// full message log, created_at ascending
    async fn message_list(&self, thread_id: ThreadId) -> Result<Vec<Message>>;

    /// messages with created_at strictly after `after`; `None` means all
    async fn message_list_after(
        &self,
        thread_id: ThreadId,
        after: Option<Time>,
    ) -> Result<Vec<Message>>;
}

#[async_trait]
pub trait DataUnread {
    /// set a read cursor to an explicit instant
    async fn unread_put(&self, thread_id: ThreadId, user_id: UserId, at: Time) -> Result<()>;

    /// set a read cursor to the store's now, returning the instant written
    async fn unread_ack(&self, thread_id: ThreadId, user_id: UserId) -> Result<Time>;

    /// `None` means the participant never read the thread
    async fn unread_get(&self, thread_id: ThreadId, user_id: UserId) -> Result<Option<Time>>;
}

#[async_trait]
pub trait DataInquiry {
    async fn inquiry_create(&self, create: DbInquiryCreate) -> Result<Inquiry>;
    async fn inquiry_list(&self, listing_id: ListingId) -> Result<Vec<Inquiry>>;
    async fn inquiry_get(&self, listing_id: ListingId, inquiry_id: InquiryId) -> Result<Inquiry>;
    async fn inquiry_delete(&self, listing_id: ListingId, inquiry_id: InquiryId) -> Result<()>;
}
