use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use types::{UserId, UserProfile};

use crate::{Error, Result, ServerStateInner};

/// The process-wide identity: who is currently signed in, as a reactive
/// stream. Sessions age out after `config.session.max_age_secs`; the check
/// runs on an interval rather than a precise deadline.
pub struct ServiceSessions {
    state: Arc<ServerStateInner>,
    current: watch::Sender<Option<UserProfile>>,
    logout_timer: Mutex<Option<AbortHandle>>,
}

impl ServiceSessions {
    pub fn new(state: Arc<ServerStateInner>) -> Self {
        Self {
            state,
            current: watch::channel(None).0,
            logout_timer: Mutex::new(None),
        }
    }

    /// load the profile and make it the current identity
    pub async fn sign_in(&self, user_id: UserId) -> Result<UserProfile> {
        let user = self.state.data().user_get(user_id).await?;
        self.current.send_replace(Some(user.clone()));
        self.start_logout_timer();
        Ok(user)
    }

    pub fn sign_out(&self) {
        if let Some(timer) = self.logout_timer.lock().unwrap().take() {
            timer.abort();
        }
        self.current.send_replace(None);
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.current.borrow().clone()
    }

    pub fn require_current(&self) -> Result<UserProfile> {
        self.current().ok_or(Error::MissingAuth)
    }

    /// live optional identity; emits on sign-in and sign-out
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.current.subscribe()
    }

    fn start_logout_timer(&self) {
        let mut guard = self.logout_timer.lock().unwrap();
        if let Some(timer) = guard.take() {
            timer.abort();
        }
        let max_age = Duration::from_secs(self.state.config.session.max_age_secs);
        let sweep = Duration::from_secs(self.state.config.session.sweep_interval_secs);
        let services = self.state.services.clone();
        let handle = tokio::spawn(async move {
            let signed_in = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(sweep);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if signed_in.elapsed() >= max_age {
                    if let Some(services) = services.upgrade() {
                        services.sessions.sign_out();
                    }
                    return;
                }
            }
        });
        *guard = Some(handle.abort_handle());
    }
}
