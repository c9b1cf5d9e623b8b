//! Domain logic for courier.
//!
//! Everything here is synchronous and side-effect free: `AppState` is a plain
//! value, and each mutation consumes it and hands back the next state. Timers,
//! persistence and notifications live in `courier-api`.

pub mod auth;
pub mod error;
pub mod policy;
pub mod reactions;
pub mod state;
pub mod views;
pub mod visibility;

pub use error::{AuthError, DomainError};
pub use policy::{AcceptancePolicy, Decision, FixedDecision, RandomAcceptance};
pub use state::{AppState, ConnectionRequest, RequestOutcome, Resolution};
