use std::{
    ops::Deref,
    pin::Pin,
    sync::{Arc, Weak},
};

use futures::Stream;
use tokio::sync::broadcast;
use types::MessageSync;

use crate::{config::Config, data::Data, services::Services};

pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

pub struct ServerStateInner {
    pub config: Config,
    pub services: Weak<Services>,
    store: Arc<dyn Data>,

    /// ALL change events on the server
    events: broadcast::Sender<MessageSync>,
}

impl ServerStateInner {
    pub fn data(&self) -> &dyn Data {
        &*self.store
    }

    pub fn services(&self) -> Arc<Services> {
        self.services
            .upgrade()
            .expect("services should always exist while serverstateinner is alive")
    }

    /// emit a change event to every live subscription
    pub fn broadcast(&self, msg: MessageSync) {
        let _ = self.events.send(msg);
    }

    /// subscribe to every change event on the server; live queries are built
    /// from a snapshot read plus one of these
    pub fn subscribe(&self) -> broadcast::Receiver<MessageSync> {
        self.events.subscribe()
    }
}

pub struct ServerState {
    pub inner: Arc<ServerStateInner>,
    pub services: Arc<Services>,
}

impl ServerState {
    pub fn init(config: Config, store: Arc<dyn Data>) -> Self {
        let services = Arc::new_cyclic(|weak| {
            let inner = Arc::new(ServerStateInner {
                events: broadcast::channel(config.events.broadcast_capacity).0,
                config,
                services: weak.to_owned(),
                store,
            });
            Services::new(inner)
        });
        Self {
            inner: services.state.clone(),
            services,
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn services(&self) -> Arc<Services> {
        self.services.clone()
    }
}

impl Deref for ServerState {
    type Target = ServerStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
