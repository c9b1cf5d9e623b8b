//! HTTP surface and per-session runtime for courier.
//!
//! Each login opens a [`messenger::Messenger`] that owns the session's state,
//! runs its timers and writes every change back to the remote store.

pub mod auth;
pub mod contacts;
pub mod error;
pub mod messages;
pub mod messenger;
pub mod middleware;
pub mod notifications;
pub mod photos;
pub mod posts;
pub mod reactions;
pub mod routes;
pub mod sessions;

pub use auth::{ApiState, ApiStateInner};
pub use error::ApiError;
pub use messenger::{Collaborators, Messenger, MessengerConfig};
pub use routes::router;
