use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use courier_types::api::CreatePostRequest;

use crate::error::ApiError;
use crate::middleware::Session;

/// GET /posts: the viewer's own posts and those of connected contacts.
pub async fn list_posts(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(session.messenger.visible_posts().await)
}

pub async fn create_post(
    Extension(session): Extension<Session>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = session.messenger.create_post(req.text).await?;
    Ok((StatusCode::CREATED, Json(post)))
}
