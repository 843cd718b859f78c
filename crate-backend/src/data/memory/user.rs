use async_trait::async_trait;
use types::{UserId, UserProfile};

use crate::data::DataUser;
use crate::error::{Error, Result};

use super::Memory;

#[async_trait]
impl DataUser for Memory {
    async fn user_put(&self, user: UserProfile) -> Result<()> {
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn user_get(&self, user_id: UserId) -> Result<UserProfile> {
        self.users
            .get(&user_id)
            .map(|u| u.clone())
            .ok_or(Error::NotFound)
    }
}
