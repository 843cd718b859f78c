use std::sync::Arc;

use chats::ServiceChats;
use inquiries::ServiceInquiries;
use messages::ServiceMessages;
use previews::ServicePreviews;
use sessions::ServiceSessions;
use unread::ServiceUnread;
use users::ServiceUsers;

use crate::ServerStateInner;

pub mod chats;
pub mod inquiries;
pub mod messages;
pub mod previews;
pub mod sessions;
pub mod unread;
pub mod users;

pub struct Services {
    pub(super) state: Arc<ServerStateInner>,
    pub chats: ServiceChats,
    pub inquiries: ServiceInquiries,
    pub messages: ServiceMessages,
    pub previews: ServicePreviews,
    pub sessions: ServiceSessions,
    pub unread: ServiceUnread,
    pub users: ServiceUsers,
}

impl Services {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self {
            chats: ServiceChats::new(state.clone()),
            inquiries: ServiceInquiries::new(state.clone()),
            messages: ServiceMessages::new(state.clone()),
            previews: ServicePreviews::new(state.clone()),
            sessions: ServiceSessions::new(state.clone()),
            unread: ServiceUnread::new(state.clone()),
            users: ServiceUsers::new(state.clone()),
            state,
        }
    }
}
