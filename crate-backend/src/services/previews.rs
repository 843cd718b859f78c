use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_stream::wrappers::ReceiverStream;
use types::{ChatPreview, MessageSync, Thread, ThreadId, UserId};

use crate::data::{DataMessage, DataThread, DataUnread};
use crate::state::BoxStream;
use crate::{Error, Result, ServerStateInner};

/// Chat list aggregation: one live preview per thread a user participates
/// in, joined from the thread, the user's read cursor, and the message log.
pub struct ServicePreviews {
    state: Arc<ServerStateInner>,
}

impl ServicePreviews {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    /// live chat list for a user, newest activity first. A user with no
    /// threads gets an empty list right away. Dropping the stream tears down
    /// the aggregation and every per-thread subscription under it.
    pub fn listen_for_user(&self, user_id: UserId) -> BoxStream<Result<Vec<ChatPreview>>> {
        let state = self.state.clone();
        let (out, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let (child_tx, child_rx) = mpsc::channel(64);
            let agg = Aggregator {
                state,
                user_id,
                out,
                child_tx,
                child_rx,
                children: HashMap::new(),
                latest: HashMap::new(),
                pending: HashSet::new(),
            };
            agg.run().await;
        });
        Box::pin(ReceiverStream::new(rx))
    }
}

enum ChildUpdate {
    Preview(ThreadId, ChatPreview),
    Failed(Error),
}

/// Fan-in over a changing set of per-thread subscriptions. The thread set is
/// re-diffed against the child map whenever a thread event arrives; the
/// combined list is re-published after every child emission, once every
/// child has reported at least once.
struct Aggregator {
    state: Arc<ServerStateInner>,
    user_id: UserId,
    out: mpsc::Sender<Result<Vec<ChatPreview>>>,
    child_tx: mpsc::Sender<ChildUpdate>,
    child_rx: mpsc::Receiver<ChildUpdate>,
    children: HashMap<ThreadId, AbortHandle>,
    latest: HashMap<ThreadId, ChatPreview>,
    pending: HashSet<ThreadId>,
}

impl Drop for Aggregator {
    fn drop(&mut self) {
        for (_, child) in self.children.drain() {
            child.abort();
        }
    }
}

impl Aggregator {
    async fn run(mut self) {
        let mut events = self.state.subscribe();

        match self.state.data().thread_list(self.user_id).await {
            Ok(threads) => self.sync_children(&threads),
            Err(err) => {
                let _ = self.out.send(Err(err)).await;
                return;
            }
        }
        // zero threads emit an empty list immediately instead of staying
        // silent until the first thread appears
        if self.children.is_empty() && !self.publish().await {
            return;
        }

        loop {
            tokio::select! {
                update = self.child_rx.recv() => match update {
                    Some(ChildUpdate::Preview(thread_id, preview)) => {
                        // a child cancelled by a re-diff may still have an
                        // update in flight
                        if !self.children.contains_key(&thread_id) {
                            continue;
                        }
                        self.pending.remove(&thread_id);
                        self.latest.insert(thread_id, preview);
                        if self.pending.is_empty() && !self.publish().await {
                            return;
                        }
                    }
                    Some(ChildUpdate::Failed(err)) => {
                        let _ = self.out.send(Err(err)).await;
                        return;
                    }
                    // unreachable while we hold a child_tx
                    None => return,
                },
                event = events.recv() => {
                    let resync = match event {
                        Ok(MessageSync::ThreadCreate { thread }) => {
                            thread.has_participant(self.user_id)
                        }
                        Ok(_) => false,
                        Err(RecvError::Lagged(_)) => true,
                        Err(RecvError::Closed) => return,
                    };
                    if resync {
                        match self.state.data().thread_list(self.user_id).await {
                            Ok(threads) => self.sync_children(&threads),
                            Err(err) => {
                                let _ = self.out.send(Err(err)).await;
                                return;
                            }
                        }
                        if self.pending.is_empty() && !self.publish().await {
                            return;
                        }
                    }
                }
                _ = self.out.closed() => return,
            }
        }
    }

    /// diff the wanted thread set against the running children: start a
    /// subscription per addition, cancel-and-remove per removal
    fn sync_children(&mut self, threads: &[Thread]) {
        let want: HashSet<ThreadId> = threads.iter().map(|t| t.id).collect();

        let gone: Vec<ThreadId> = self
            .children
            .keys()
            .filter(|id| !want.contains(id))
            .copied()
            .collect();
        for thread_id in gone {
            if let Some(child) = self.children.remove(&thread_id) {
                child.abort();
            }
            self.latest.remove(&thread_id);
            self.pending.remove(&thread_id);
        }

        for thread in threads {
            if self.children.contains_key(&thread.id) {
                continue;
            }
            self.pending.insert(thread.id);
            let handle = tokio::spawn(child_loop(
                self.state.clone(),
                thread.id,
                self.user_id,
                self.child_tx.clone(),
            ));
            self.children.insert(thread.id, handle.abort_handle());
        }
    }

    async fn publish(&mut self) -> bool {
        let mut list: Vec<ChatPreview> = self.latest.values().cloned().collect();
        list.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        self.out.send(Ok(list)).await.is_ok()
    }
}

/// one per-thread subscription: recompute the preview on every event that
/// can change it
async fn child_loop(
    state: Arc<ServerStateInner>,
    thread_id: ThreadId,
    user_id: UserId,
    tx: mpsc::Sender<ChildUpdate>,
) {
    let mut events = state.subscribe();
    loop {
        match compute_preview(&state, thread_id, user_id).await {
            Ok(preview) => {
                if tx
                    .send(ChildUpdate::Preview(thread_id, preview))
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(ChildUpdate::Failed(err)).await;
                return;
            }
        }
        loop {
            match events.recv().await {
                Ok(event) if affects_preview(&event, thread_id, user_id) => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => break,
                Err(RecvError::Closed) => return,
            }
        }
    }
}

fn affects_preview(event: &MessageSync, thread_id: ThreadId, user_id: UserId) -> bool {
    match event {
        MessageSync::MessageCreate { message } => message.thread_id == thread_id,
        MessageSync::ThreadUpdate { thread } => thread.id == thread_id,
        MessageSync::ThreadAck {
            thread_id: acked,
            user_id: reader,
            ..
        } => *acked == thread_id && *reader == user_id,
        _ => false,
    }
}

async fn compute_preview(
    state: &ServerStateInner,
    thread_id: ThreadId,
    user_id: UserId,
) -> Result<ChatPreview> {
    let data = state.data();
    let thread = data.thread_get(thread_id).await?;
    let other_user_id = thread
        .other_participant(user_id)
        .ok_or(Error::MissingPermissions)?;
    let last_read_at = data.unread_get(thread_id, user_id).await?;
    let newer = data.message_list_after(thread_id, last_read_at).await?;
    let unread_count = newer.iter().filter(|m| m.sender_id != user_id).count() as u64;
    Ok(ChatPreview {
        thread_id,
        listing_id: thread.listing_id,
        other_user_id,
        last_message_at: thread.last_message_at,
        last_read_at,
        unread_count,
    })
}
