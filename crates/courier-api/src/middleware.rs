use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::ApiState;
use crate::error::ApiError;
use crate::messenger::Messenger;

/// The caller's session, inserted by [`require_session`].
#[derive(Clone)]
pub struct Session {
    pub token: Uuid,
    pub messenger: Messenger,
}

/// Resolve the bearer token in the Authorization header to a live session.
pub async fn require_session(
    State(state): State<ApiState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|v| v.trim().parse::<Uuid>().ok())
        .ok_or_else(ApiError::unauthorized)?;

    let messenger = state
        .sessions
        .get(&token)
        .await
        .ok_or_else(ApiError::unauthorized)?;

    req.extensions_mut().insert(Session { token, messenger });
    Ok(next.run(req).await)
}
