use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use types::{Message, MessageSync, ThreadId};

use crate::consts::MESSAGE_MAX_LEN;
use crate::data::{DataMessage, DataThread};
use crate::state::BoxStream;
use crate::types::DbMessageCreate;
use crate::{Error, Result, ServerStateInner};

/// The message feed: an append-only log per thread, readable as a live
/// stream.
pub struct ServiceMessages {
    state: Arc<ServerStateInner>,
}

impl ServiceMessages {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    pub async fn send(&self, thread_id: ThreadId, content: &str) -> Result<Message> {
        let caller = self.state.services().sessions.require_current()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::BadStatic("message content is empty"));
        }
        if content.len() > MESSAGE_MAX_LEN {
            return Err(Error::TooBig);
        }
        let data = self.state.data();
        let thread = data.thread_get(thread_id).await?;
        if !thread.has_participant(caller.id) {
            return Err(Error::MissingPermissions);
        }

        let message = data
            .message_create(DbMessageCreate {
                thread_id,
                sender_id: caller.id,
                // copied at send time on purpose: profile edits must not
                // rewrite old messages
                sender_name: caller.display_name.clone(),
                sender_email: caller.email.clone(),
                content: content.to_string(),
            })
            .await?;
        let thread = data.thread_touch(thread_id, message.created_at).await?;

        self.state.broadcast(MessageSync::MessageCreate {
            message: message.clone(),
        });
        self.state.broadcast(MessageSync::ThreadUpdate { thread });
        Ok(message)
    }

    /// live ascending message log for a thread; emits the current snapshot
    /// immediately and again after every change. Dropping the stream cancels
    /// the subscription.
    pub fn listen(&self, thread_id: ThreadId) -> BoxStream<Result<Vec<Message>>> {
        let state = self.state.clone();
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            // subscribe before the first read so no update slips between
            // snapshot and subscription
            let mut events = state.subscribe();
            loop {
                match state.data().message_list(thread_id).await {
                    Ok(messages) => {
                        if tx.send(Ok(messages)).await.is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(err)).await;
                        return;
                    }
                }
                // wait for the next relevant change
                loop {
                    match events.recv().await {
                        Ok(MessageSync::MessageCreate { message })
                            if message.thread_id == thread_id =>
                        {
                            break;
                        }
                        Ok(_) => continue,
                        // lagged: resync from a fresh snapshot
                        Err(RecvError::Lagged(_)) => break,
                        Err(RecvError::Closed) => return,
                    }
                }
            }
        });
        Box::pin(ReceiverStream::new(rx))
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use futures::StreamExt;
    use types::{ListingId, Message, ThreadId, UserId};

    use crate::data::{DataMessage, DataThread};
    use crate::services::testing;
    use crate::{Error, ServerState};

    async fn thread_between(state: &ServerState, a: UserId, b: UserId) -> ThreadId {
        let srv = state.services();
        srv.sessions.sign_in(a).await.unwrap();
        srv.chats.get_or_create(ListingId::new(), b).await.unwrap()
    }

    async fn next_snapshot(
        stream: &mut crate::BoxStream<crate::Result<Vec<Message>>>,
    ) -> Vec<Message> {
        tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("stream produced nothing within 5s")
            .expect("stream ended")
            .expect("stream errored")
    }

    #[tokio::test]
    async fn send_appends_and_bumps_the_thread() {
        let state = testing::state();
        let srv = state.services();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let thread_id = thread_between(&state, bruno.id, anna.id).await;

        let first = srv.messages.send(thread_id, "hello").await.unwrap();
        let second = srv.messages.send(thread_id, "anyone home?").await.unwrap();
        assert_eq!(first.sender_name, "bruno");
        assert_eq!(first.sender_email, "bruno@example.com");
        assert!(second.created_at > first.created_at);

        let log = state.data().message_list(thread_id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, "hello");

        let thread = state.data().thread_get(thread_id).await.unwrap();
        assert_eq!(thread.last_message_at, second.created_at);
    }

    #[tokio::test]
    async fn whitespace_only_content_is_rejected_without_writes() {
        let state = testing::state();
        let srv = state.services();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let thread_id = thread_between(&state, bruno.id, anna.id).await;
        let before = state.data().thread_get(thread_id).await.unwrap();

        let err = srv.messages.send(thread_id, "   ").await.unwrap_err();
        assert!(matches!(err, Error::BadStatic(_)));

        // no message appeared and last_message_at did not move
        assert!(state.data().message_list(thread_id).await.unwrap().is_empty());
        let after = state.data().thread_get(thread_id).await.unwrap();
        assert_eq!(after.last_message_at, before.last_message_at);
    }

    #[tokio::test]
    async fn only_participants_and_identities_can_send() {
        let state = testing::state();
        let srv = state.services();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let carla = testing::register(&state, "carla").await;
        let thread_id = thread_between(&state, bruno.id, anna.id).await;

        srv.sessions.sign_out();
        let err = srv.messages.send(thread_id, "hi").await.unwrap_err();
        assert!(matches!(err, Error::MissingAuth));

        srv.sessions.sign_in(carla.id).await.unwrap();
        let err = srv.messages.send(thread_id, "hi").await.unwrap_err();
        assert!(matches!(err, Error::MissingPermissions));
    }

    #[tokio::test]
    async fn listen_emits_snapshots_in_order() {
        let state = testing::state();
        let srv = state.services();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let thread_id = thread_between(&state, bruno.id, anna.id).await;
        srv.messages.send(thread_id, "first").await.unwrap();

        let mut stream = srv.messages.listen(thread_id);
        let snapshot = next_snapshot(&mut stream).await;
        assert_eq!(snapshot.len(), 1);

        srv.messages.send(thread_id, "second").await.unwrap();
        let mut snapshot = next_snapshot(&mut stream).await;
        while snapshot.len() < 2 {
            snapshot = next_snapshot(&mut stream).await;
        }
        assert_eq!(snapshot[0].content, "first");
        assert_eq!(snapshot[1].content, "second");
        for pair in snapshot.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn listen_on_an_empty_thread_emits_immediately() {
        let state = testing::state();
        let srv = state.services();
        let anna = testing::register(&state, "anna").await;
        let bruno = testing::register(&state, "bruno").await;
        let thread_id = thread_between(&state, bruno.id, anna.id).await;

        let mut stream = srv.messages.listen(thread_id);
        assert!(next_snapshot(&mut stream).await.is_empty());
    }
}
