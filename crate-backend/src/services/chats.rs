use std::sync::Arc;

use types::{ListingId, MessageSync, ThreadId, UserId};

use crate::data::{DataThread, DataUnread, DataUser};
use crate::types::DbThreadCreate;
use crate::{Error, Result, ServerStateInner};

/// Thread directory: one thread per (listing, participant pair).
pub struct ServiceChats {
    state: Arc<ServerStateInner>,
}

impl ServiceChats {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    /// resolve the caller's thread with `other_id` on a listing, creating it
    /// on first contact
    pub async fn get_or_create(
        &self,
        listing_id: ListingId,
        other_id: UserId,
    ) -> Result<ThreadId> {
        let caller = self.state.services().sessions.require_current()?;
        if caller.id == other_id {
            return Err(Error::BadStatic("can't chat with yourself"));
        }
        let data = self.state.data();
        data.user_get(other_id).await?;

        // the pair lookup is order independent
        if let Some(existing) = data.thread_find(listing_id, caller.id, other_id).await? {
            return Ok(existing.id);
        }

        let thread = data
            .thread_create(DbThreadCreate {
                listing_id,
                creator_id: caller.id,
                other_id,
            })
            .await?;
        // the creator has seen everything up to the creation instant; the
        // other participant starts with no cursor at all
        data.unread_put(thread.id, caller.id, thread.created_at).await?;
        self.state.broadcast(MessageSync::ThreadCreate {
            thread: thread.clone(),
        });
        Ok(thread.id)
    }
}
