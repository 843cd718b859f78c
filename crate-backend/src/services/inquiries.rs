use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use types::{Inquiry, InquiryId, ListingId, MessageSync};

use crate::consts::MESSAGE_MAX_LEN;
use crate::data::DataInquiry;
use crate::state::BoxStream;
use crate::types::DbInquiryCreate;
use crate::{Error, Result, ServerStateInner};

/// Contact messages left on a listing, outside any chat thread.
pub struct ServiceInquiries {
    state: Arc<ServerStateInner>,
}

impl ServiceInquiries {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    pub async fn send(&self, listing_id: ListingId, content: &str) -> Result<Inquiry> {
        let caller = self.state.services().sessions.require_current()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::BadStatic("inquiry content is empty"));
        }
        if content.len() > MESSAGE_MAX_LEN {
            return Err(Error::TooBig);
        }
        let inquiry = self
            .state
            .data()
            .inquiry_create(DbInquiryCreate {
                listing_id,
                sender_id: caller.id,
                sender_name: caller.display_name.clone(),
                sender_email: caller.email.clone(),
                content: content.to_string(),
            })
            .await?;
        self.state.broadcast(MessageSync::InquiryCreate {
            inquiry: inquiry.clone(),
        });
        Ok(inquiry)
    }

    pub async fn list(&self, listing_id: ListingId) -> Result<Vec<Inquiry>> {
        self.state.data().inquiry_list(listing_id).await
    }

    /// live inquiry list for a listing, oldest first
    pub fn listen(&self, listing_id: ListingId) -> BoxStream<Result<Vec<Inquiry>>> {
        let state = self.state.clone();
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut events = state.subscribe();
            loop {
                match state.data().inquiry_list(listing_id).await {
                    Ok(inquiries) => {
                        if tx.send(Ok(inquiries)).await.is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(err)).await;
                        return;
                    }
                }
                loop {
                    let relevant = match events.recv().await {
                        Ok(MessageSync::InquiryCreate { inquiry }) => {
                            inquiry.listing_id == listing_id
                        }
                        Ok(MessageSync::InquiryDelete {
                            listing_id: deleted_from,
                            ..
                        }) => deleted_from == listing_id,
                        Ok(_) => false,
                        Err(RecvError::Lagged(_)) => true,
                        Err(RecvError::Closed) => return,
                    };
                    if relevant {
                        break;
                    }
                }
            }
        });
        Box::pin(ReceiverStream::new(rx))
    }

    /// senders may remove their own inquiry again
    pub async fn delete(&self, listing_id: ListingId, inquiry_id: InquiryId) -> Result<()> {
        let caller = self.state.services().sessions.require_current()?;
        let data = self.state.data();
        let inquiry = data.inquiry_get(listing_id, inquiry_id).await?;
        if inquiry.sender_id != caller.id {
            return Err(Error::MissingPermissions);
        }
        data.inquiry_delete(listing_id, inquiry_id).await?;
        self.state.broadcast(MessageSync::InquiryDelete {
            listing_id,
            inquiry_id,
        });
        Ok(())
    }
}
