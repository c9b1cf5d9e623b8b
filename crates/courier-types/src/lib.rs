//! Shared data model for courier.
//!
//! `models` mirrors the JSON documents stored in the remote spreadsheet, so
//! field names follow the stored camelCase layout. `api` holds the HTTP
//! request and response bodies.

pub mod api;
pub mod models;
