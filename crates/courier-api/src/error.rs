use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use courier_core::{AuthError, DomainError};

/// Error returned by every handler. Rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub const STORE_UNAVAILABLE: &str = "Error de conexión. Verifica que la URL termine en \"/exec\" \
     y que los permisos sean \"Cualquier usuario\" (Anyone).";

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Sesión no válida.")
    }

    /// The remote store could not be read. No retry is attempted.
    pub fn store_unavailable() -> Self {
        Self::new(StatusCode::BAD_GATEWAY, STORE_UNAVAILABLE)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::UnknownContact(_)
            | DomainError::UnknownPost(_)
            | DomainError::UnknownPhoto(_) => StatusCode::NOT_FOUND,
            DomainError::ContactPending(_) => StatusCode::CONFLICT,
            DomainError::NotPhotoOwner => StatusCode::FORBIDDEN,
            DomainError::MissingContactFields | DomainError::EmptyMessage | DomainError::EmptyPost => {
                StatusCode::BAD_REQUEST
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::MissingFields => StatusCode::BAD_REQUEST,
            AuthError::PhoneTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}
