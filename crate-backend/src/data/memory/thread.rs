use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use types::{ListingId, Thread, ThreadId, Time, UserId};

use crate::data::DataThread;
use crate::error::{Error, Result};
use crate::types::DbThreadCreate;

use super::{ensure_canonical, Memory};

#[async_trait]
impl DataThread for Memory {
    async fn thread_create(&self, create: DbThreadCreate) -> Result<Thread> {
        let (a, b) = ensure_canonical(create.creator_id, create.other_id);
        let key = (create.listing_id, a, b);

        // entry holds the shard lock, so the check and the insert are one
        // step and a racing creator gets the winner's thread back
        let thread_id = match self.pair_index.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let now = Time::now_utc();
                let thread = Thread {
                    id: ThreadId::new(),
                    listing_id: create.listing_id,
                    participant_ids: [create.creator_id, create.other_id],
                    created_at: now,
                    last_message_at: now,
                };
                self.threads.insert(thread.id, thread.clone());
                *e.insert(thread.id)
            }
        };

        self.thread_get(thread_id).await
    }

    async fn thread_get(&self, thread_id: ThreadId) -> Result<Thread> {
        self.threads
            .get(&thread_id)
            .map(|t| t.clone())
            .ok_or(Error::NotFound)
    }

    async fn thread_find(
        &self,
        listing_id: ListingId,
        user_a_id: UserId,
        user_b_id: UserId,
    ) -> Result<Option<Thread>> {
        let (a, b) = ensure_canonical(user_a_id, user_b_id);
        let found = self.pair_index.get(&(listing_id, a, b)).map(|id| *id);
        match found {
            Some(thread_id) => Ok(Some(self.thread_get(thread_id).await?)),
            None => Ok(None),
        }
    }

    async fn thread_list(&self, user_id: UserId) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.has_participant(user_id))
            .map(|t| t.clone())
            .collect();
        threads.sort_by(|x, y| y.last_message_at.cmp(&x.last_message_at));
        Ok(threads)
    }

    async fn thread_touch(&self, thread_id: ThreadId, at: Time) -> Result<Thread> {
        let mut thread = self.threads.get_mut(&thread_id).ok_or(Error::NotFound)?;
        if at > thread.last_message_at {
            thread.last_message_at = at;
        }
        Ok(thread.clone())
    }
}
