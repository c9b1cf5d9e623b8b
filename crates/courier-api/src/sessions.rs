use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::messenger::Messenger;

/// Live sessions, keyed by bearer token. Nothing here outlives the process.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<Uuid, Messenger>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, messenger: Messenger) -> Uuid {
        let token = Uuid::new_v4();
        info!("Session opened for {}", messenger.viewer().phone);
        self.inner.write().await.insert(token, messenger);
        token
    }

    pub async fn get(&self, token: &Uuid) -> Option<Messenger> {
        self.inner.read().await.get(token).cloned()
    }

    /// Drops the session. Timers already scheduled for it still run against
    /// their own handle, but their changes are no longer written to the store.
    pub async fn close(&self, token: &Uuid) -> bool {
        match self.inner.write().await.remove(token) {
            Some(messenger) => {
                messenger.close();
                info!("Session closed for {}", messenger.viewer().phone);
                true
            }
            None => false,
        }
    }
}
