use async_trait::async_trait;
use types::{Inquiry, InquiryId, ListingId, Time};

use crate::data::DataInquiry;
use crate::error::{Error, Result};
use crate::types::DbInquiryCreate;

use super::Memory;

#[async_trait]
impl DataInquiry for Memory {
    async fn inquiry_create(&self, create: DbInquiryCreate) -> Result<Inquiry> {
        let inquiry = Inquiry {
            id: InquiryId::new(),
            listing_id: create.listing_id,
            sender_id: create.sender_id,
            sender_name: create.sender_name,
            sender_email: create.sender_email,
            content: create.content,
            created_at: Time::now_utc(),
        };
        self.inquiries
            .entry(create.listing_id)
            .or_default()
            .push(inquiry.clone());
        Ok(inquiry)
    }

    async fn inquiry_list(&self, listing_id: ListingId) -> Result<Vec<Inquiry>> {
        Ok(self
            .inquiries
            .get(&listing_id)
            .map(|list| list.clone())
            .unwrap_or_default())
    }

    async fn inquiry_get(&self, listing_id: ListingId, inquiry_id: InquiryId) -> Result<Inquiry> {
        self.inquiry_list(listing_id)
            .await?
            .into_iter()
            .find(|i| i.id == inquiry_id)
            .ok_or(Error::NotFound)
    }

    async fn inquiry_delete(&self, listing_id: ListingId, inquiry_id: InquiryId) -> Result<()> {
        let mut list = self.inquiries.get_mut(&listing_id).ok_or(Error::NotFound)?;
        let before = list.len();
        list.retain(|i| i.id != inquiry_id);
        if list.len() == before {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}
