use axum::{
    Extension, Json,
    body::Bytes,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::debug;

use crate::error::ApiError;
use crate::middleware::Session;

/// 10 MB upload limit for photos
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

pub async fn list_photos(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(session.messenger.visible_photos().await)
}

/// POST /photos: accepts the raw image bytes and stores them inline as a
/// `data:` URL.
pub async fn upload_photo(
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::bad_request("La imagen está vacía."));
    }

    if bytes.len() > MAX_PHOTO_SIZE {
        return Err(ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "La imagen supera el tamaño máximo de 10 MB.",
        ));
    }

    let mime = image_mime(&headers)?;
    debug!("Uploading {} byte {} photo", bytes.len(), mime);

    let url = to_data_url(&mime, &bytes);
    let photo = session.messenger.add_photo(url).await;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn delete_photo(
    Extension(session): Extension<Session>,
    Path(photo_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    session.messenger.delete_photo(&photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn image_mime(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .filter(|mime| mime.starts_with("image/"))
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Solo se permiten imágenes.",
            )
        })
}

fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", B64.encode(bytes))
}
