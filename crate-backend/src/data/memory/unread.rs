use async_trait::async_trait;
use types::{ThreadId, Time, UserId};

use crate::data::DataUnread;
use crate::error::{Error, Result};

use super::Memory;

#[async_trait]
impl DataUnread for Memory {
    async fn unread_put(&self, thread_id: ThreadId, user_id: UserId, at: Time) -> Result<()> {
        if !self.threads.contains_key(&thread_id) {
            return Err(Error::NotFound);
        }
        self.unread.insert((thread_id, user_id), at);
        Ok(())
    }

    async fn unread_ack(&self, thread_id: ThreadId, user_id: UserId) -> Result<Time> {
        if !self.threads.contains_key(&thread_id) {
            return Err(Error::NotFound);
        }
        // never behind the newest message, so an ack always catches up even
        // within the same clock tick
        let mut at = Time::now_utc();
        if let Some(log) = self.messages.get(&thread_id) {
            if let Some(last) = log.last() {
                if last.created_at > at {
                    at = last.created_at;
                }
            }
        }
        self.unread.insert((thread_id, user_id), at);
        Ok(at)
    }

    async fn unread_get(&self, thread_id: ThreadId, user_id: UserId) -> Result<Option<Time>> {
        Ok(self.unread.get(&(thread_id, user_id)).map(|at| *at))
    }
}
