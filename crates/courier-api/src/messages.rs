use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use courier_types::api::{ChatQuery, SendMessageRequest};

use crate::error::ApiError;
use crate::middleware::Session;

/// GET /chats: one preview per conversation, newest first.
pub async fn list_chats(
    Extension(session): Extension<Session>,
    Query(query): Query<ChatQuery>,
) -> impl IntoResponse {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    Json(session.messenger.chat_previews(search).await)
}

/// GET /chats/{phone}/messages: refused while the contact is still pending.
pub async fn get_messages(
    Extension(session): Extension<Session>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(session.messenger.open_chat(&phone).await?))
}

pub async fn send_message(
    Extension(session): Extension<Session>,
    Path(phone): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = session
        .messenger
        .send_message(&phone, req.text, req.image_url)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
