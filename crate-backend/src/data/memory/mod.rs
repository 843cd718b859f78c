use dashmap::DashMap;
use types::{Inquiry, InquiryId, ListingId, Message, Thread, ThreadId, Time, UserId, UserProfile};

use crate::data::Data;

mod inquiry;
mod message;
mod thread;
mod unread;
mod user;

/// In-memory reference backend. Server timestamps are assigned at commit
/// time; per-thread message timestamps are kept strictly increasing even
/// when the wall clock stalls.
#[derive(Default)]
pub struct Memory {
    users: DashMap<UserId, UserProfile>,
    threads: DashMap<ThreadId, Thread>,

    /// (listing, canonical participant pair) -> thread; the index that makes
    /// thread creation idempotent
    pair_index: DashMap<(ListingId, UserId, UserId), ThreadId>,

    messages: DashMap<ThreadId, Vec<Message>>,
    unread: DashMap<(ThreadId, UserId), Time>,
    inquiries: DashMap<ListingId, Vec<Inquiry>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_canonical(a: UserId, b: UserId) -> (UserId, UserId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Data for Memory {}

#[cfg(test)]
mod test {
    use super::Memory;
    use crate::data::{DataMessage, DataThread};
    use crate::types::{DbMessageCreate, DbThreadCreate};
    use std::sync::Arc;
    use types::{ListingId, ThreadId, UserId};

    fn msg(thread_id: ThreadId, sender_id: UserId) -> DbMessageCreate {
        DbMessageCreate {
            thread_id,
            sender_id,
            sender_name: "sender".to_string(),
            sender_email: "sender@example.com".to_string(),
            content: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_pair_yield_one_thread() {
        let store = Arc::new(Memory::new());
        let listing_id = ListingId::new();
        let a = UserId::new();
        let b = UserId::new();

        let mut handles = vec![];
        for _ in 0..8 {
            let store_fwd = store.clone();
            // half the writers see the pair in reversed order
            handles.push(tokio::spawn(async move {
                store_fwd
                    .thread_create(DbThreadCreate {
                        listing_id,
                        creator_id: a,
                        other_id: b,
                    })
                    .await
                    .unwrap()
            }));
            let store_rev = store.clone();
            handles.push(tokio::spawn(async move {
                store_rev
                    .thread_create(DbThreadCreate {
                        listing_id,
                        creator_id: b,
                        other_id: a,
                    })
                    .await
                    .unwrap()
            }));
        }

        let mut ids = vec![];
        for h in handles {
            ids.push(h.await.unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn message_timestamps_strictly_increase() {
        let store = Memory::new();
        let a = UserId::new();
        let b = UserId::new();
        let thread = store
            .thread_create(DbThreadCreate {
                listing_id: ListingId::new(),
                creator_id: a,
                other_id: b,
            })
            .await
            .unwrap();

        for _ in 0..50 {
            store.message_create(msg(thread.id, a)).await.unwrap();
        }
        let messages = store.message_list(thread.id).await.unwrap();
        assert_eq!(messages.len(), 50);
        for pair in messages.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn touch_never_moves_backwards() {
        let store = Memory::new();
        let thread = store
            .thread_create(DbThreadCreate {
                listing_id: ListingId::new(),
                creator_id: UserId::new(),
                other_id: UserId::new(),
            })
            .await
            .unwrap();

        let later = store
            .thread_touch(thread.id, thread.created_at + std::time::Duration::from_secs(5))
            .await
            .unwrap();
        let touched = store.thread_touch(thread.id, thread.created_at).await.unwrap();
        assert_eq!(touched.last_message_at, later.last_message_at);
    }
}
