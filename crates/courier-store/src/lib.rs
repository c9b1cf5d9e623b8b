//! Persistence transport for courier.
//!
//! The remote side is a single document holding every collection. It can
//! only be read whole and overwritten whole; there are no partial updates,
//! versions or conflict checks.

pub mod demo;
pub mod memory;
pub mod sheets;

use async_trait::async_trait;

use courier_types::models::Snapshot;

pub use demo::demo_snapshot;
pub use memory::MemoryStore;
pub use sheets::{SheetsStore, sanitize_url};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read the whole document. `None` means the store could not be reached
    /// or returned something unreadable.
    async fn fetch_all(&self) -> Option<Snapshot>;

    /// Overwrite the whole document. `true` only means the request went out;
    /// whether the remote side stored it is not observable.
    async fn replace_all(&self, snapshot: &Snapshot) -> bool;
}
