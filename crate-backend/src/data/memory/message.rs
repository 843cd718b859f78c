use std::time::Duration;

use async_trait::async_trait;
use types::{Message, MessageId, ThreadId, Time};

use crate::data::DataMessage;
use crate::error::{Error, Result};
use crate::types::DbMessageCreate;

use super::Memory;

#[async_trait]
impl DataMessage for Memory {
    async fn message_create(&self, create: DbMessageCreate) -> Result<Message> {
        if !self.threads.contains_key(&create.thread_id) {
            return Err(Error::NotFound);
        }

        // the entry lock serializes appends per thread
        let mut log = self.messages.entry(create.thread_id).or_default();
        let now = Time::now_utc();
        let created_at = match log.last() {
            Some(prev) if now <= prev.created_at => prev.created_at + Duration::from_micros(1),
            _ => now,
        };
        let message = Message {
            id: MessageId::new(),
            thread_id: create.thread_id,
            sender_id: create.sender_id,
            sender_name: create.sender_name,
            sender_email: create.sender_email,
            content: create.content,
            created_at,
        };
        log.push(message.clone());
        Ok(message)
    }

    async fn message_list(&self, thread_id: ThreadId) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .get(&thread_id)
            .map(|log| log.clone())
            .unwrap_or_default())
    }

    async fn message_list_after(
        &self,
        thread_id: ThreadId,
        after: Option<Time>,
    ) -> Result<Vec<Message>> {
        let log = self.message_list(thread_id).await?;
        Ok(match after {
            Some(after) => log
                .into_iter()
                .filter(|m| m.created_at > after)
                .collect(),
            None => log,
        })
    }
}
