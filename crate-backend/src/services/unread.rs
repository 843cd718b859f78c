use std::sync::Arc;

use tracing::warn;
use types::{MessageSync, ThreadId, UserId};

use crate::data::{DataMessage, DataUnread};
use crate::{Result, ServerStateInner};

/// Read-state tracking: one cursor per (thread, participant), compared
/// against the message log to compute unread counts.
pub struct ServiceUnread {
    state: Arc<ServerStateInner>,
}

impl ServiceUnread {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    /// move the caller's cursor to now. Best-effort: a failed cursor write
    /// must never block reading the thread, so errors are logged and
    /// swallowed. Without a signed-in identity this is a no-op.
    pub async fn mark_as_read(&self, thread_id: ThreadId) -> Result<()> {
        let Some(caller) = self.state.services().sessions.current() else {
            return Ok(());
        };
        match self.state.data().unread_ack(thread_id, caller.id).await {
            Ok(at) => {
                self.state.broadcast(MessageSync::ThreadAck {
                    thread_id,
                    user_id: caller.id,
                    at,
                });
            }
            Err(err) => {
                warn!("failed to mark thread {thread_id} as read: {err}");
            }
        }
        Ok(())
    }

    /// counterpart messages strictly newer than the viewer's cursor; a
    /// missing cursor counts everything
    pub async fn count(&self, thread_id: ThreadId, viewer_id: UserId) -> Result<u64> {
        let data = self.state.data();
        let cursor = data.unread_get(thread_id, viewer_id).await?;
        let newer = data.message_list_after(thread_id, cursor).await?;
        Ok(newer.iter().filter(|m| m.sender_id != viewer_id).count() as u64)
    }
}

#[cfg(test)]
mod test {
    use types::{ListingId, ThreadId};

    use crate::data::DataUnread;
    use crate::services::testing;
    use crate::ServerState;

    struct Pair {
        state: ServerState,
        anna: types::UserProfile,
        bruno: types::UserProfile,
        thread_id: ThreadId,
    }

    /// bruno opens a thread on anna's listing
    async fn pair() -> Pair {
        let state = testing::state();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let srv = state.services();
        srv.sessions.sign_in(bruno.id).await.unwrap();
        let thread_id = srv
            .chats
            .get_or_create(ListingId::new(), anna.id)
            .await
            .unwrap();
        Pair {
            state,
            anna,
            bruno,
            thread_id,
        }
    }

    #[tokio::test]
    async fn never_read_counts_every_counterpart_message() {
        let p = pair().await;
        let srv = p.state.services();
        for content in ["one", "two", "three"] {
            srv.messages.send(p.thread_id, content).await.unwrap();
        }
        // anna never read the thread
        assert_eq!(srv.unread.count(p.thread_id, p.anna.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn own_messages_are_never_counted() {
        let p = pair().await;
        let srv = p.state.services();
        srv.messages.send(p.thread_id, "from bruno").await.unwrap();
        assert_eq!(srv.unread.count(p.thread_id, p.bruno.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_as_read_resets_the_count() {
        let p = pair().await;
        let srv = p.state.services();
        srv.messages.send(p.thread_id, "ping").await.unwrap();
        srv.messages.send(p.thread_id, "ping again").await.unwrap();
        assert_eq!(srv.unread.count(p.thread_id, p.anna.id).await.unwrap(), 2);

        srv.sessions.sign_in(p.anna.id).await.unwrap();
        srv.unread.mark_as_read(p.thread_id).await.unwrap();
        assert_eq!(srv.unread.count(p.thread_id, p.anna.id).await.unwrap(), 0);

        // and the cycle repeats with the next message
        srv.sessions.sign_in(p.bruno.id).await.unwrap();
        srv.messages.send(p.thread_id, "one more").await.unwrap();
        assert_eq!(srv.unread.count(p.thread_id, p.anna.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_as_read_is_best_effort() {
        let p = pair().await;
        let srv = p.state.services();

        // unknown thread: the store error is swallowed
        srv.unread.mark_as_read(ThreadId::new()).await.unwrap();

        // no identity: a no-op
        srv.sessions.sign_out();
        srv.unread.mark_as_read(p.thread_id).await.unwrap();
        assert_eq!(
            p.state
                .data()
                .unread_get(p.thread_id, p.anna.id)
                .await
                .unwrap(),
            None
        );
    }
}
