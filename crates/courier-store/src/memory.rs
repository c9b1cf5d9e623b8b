use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::warn;

use courier_types::models::Snapshot;

use crate::RemoteStore;

/// In-process store. Clones share the same document.
///
/// Handy for tests and for running without a spreadsheet. `set_offline`
/// makes it behave like an unreachable endpoint.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    document: Mutex<Snapshot>,
    offline: Mutex<bool>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new(initial: Snapshot) -> Self {
        let store = Self::default();
        if let Ok(mut doc) = store.inner.document.lock() {
            *doc = initial;
        }
        store
    }

    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut flag) = self.inner.offline.lock() {
            *flag = offline;
        }
    }

    /// Current document, regardless of the offline flag.
    pub fn document(&self) -> Snapshot {
        self.inner
            .document
            .lock()
            .map(|doc| doc.clone())
            .unwrap_or_default()
    }

    /// Number of successful `replace_all` calls.
    pub fn write_count(&self) -> usize {
        self.inner.writes.lock().map(|n| *n).unwrap_or(0)
    }

    fn is_offline(&self) -> bool {
        self.inner.offline.lock().map(|f| *f).unwrap_or(true)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_all(&self) -> Option<Snapshot> {
        if self.is_offline() {
            return None;
        }
        match self.inner.document.lock() {
            Ok(doc) => Some(doc.clone()),
            Err(e) => {
                warn!("Memory store lock poisoned: {}", e);
                None
            }
        }
    }

    async fn replace_all(&self, snapshot: &Snapshot) -> bool {
        if self.is_offline() {
            return false;
        }
        match (self.inner.document.lock(), self.inner.writes.lock()) {
            (Ok(mut doc), Ok(mut writes)) => {
                *doc = snapshot.clone();
                *writes += 1;
                true
            }
            _ => {
                warn!("Memory store lock poisoned");
                false
            }
        }
    }
}
