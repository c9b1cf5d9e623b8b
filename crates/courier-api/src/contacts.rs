use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
};

use courier_core::RequestOutcome;
use courier_types::api::{AddContactRequest, AddContactResponse};

use crate::error::ApiError;
use crate::middleware::Session;

pub async fn list_contacts(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(session.messenger.contacts().await)
}

/// POST /contacts: answers before the request is resolved, hence 202.
pub async fn add_contact(
    Extension(session): Extension<Session>,
    Json(req): Json<AddContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = session
        .messenger
        .add_contact(&req.name, &req.phone, req.greeting)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AddContactResponse {
            added: outcome == RequestOutcome::Requested,
        }),
    ))
}

/// GET /contacts/{phone}/photos
pub async fn contact_photos(
    Extension(session): Extension<Session>,
    Path(phone): Path<String>,
) -> impl IntoResponse {
    Json(session.messenger.contact_photos(&phone).await)
}
