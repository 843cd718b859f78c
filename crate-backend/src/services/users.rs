use std::sync::Arc;

use types::{Time, UserCreate, UserId, UserProfile};
use validator::Validate;

use crate::{Result, ServerStateInner};

pub struct ServiceUsers {
    state: Arc<ServerStateInner>,
}

impl ServiceUsers {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self { state }
    }

    pub async fn register(&self, create: UserCreate) -> Result<UserProfile> {
        create.validate()?;
        let user = UserProfile {
            id: UserId::new(),
            display_name: create.display_name,
            email: create.email,
            created_at: Time::now_utc(),
        };
        self.state.data().user_put(user.clone()).await?;
        Ok(user)
    }

    pub async fn get(&self, user_id: UserId) -> Result<UserProfile> {
        self.state.data().user_get(user_id).await
    }
}
