use axum::{
    Extension, Json,
    extract::Path,
    response::IntoResponse,
};

use courier_types::api::{PhotoReactionRequest, PostReactionRequest};

use crate::error::ApiError;
use crate::middleware::Session;

/// Toggles the viewer's single reaction on a post.
pub async fn react_to_post(
    Extension(session): Extension<Session>,
    Path(post_id): Path<String>,
    Json(req): Json<PostReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        session.messenger.toggle_post_reaction(&post_id, req.kind).await?,
    ))
}

/// Photo reactions only ever count up.
pub async fn react_to_photo(
    Extension(session): Extension<Session>,
    Path(photo_id): Path<String>,
    Json(req): Json<PhotoReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(session.messenger.react_to_photo(&photo_id, req.kind).await?))
}
