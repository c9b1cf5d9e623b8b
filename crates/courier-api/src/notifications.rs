use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use courier_types::models::{Notification, Severity};

use crate::error::ApiError;
use crate::middleware::Session;

/// Ephemeral user-facing notifications for one session.
///
/// Each raised notification disappears on its own after the TTL unless it was
/// dismissed first.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<NotificationCenterInner>,
}

struct NotificationCenterInner {
    active: RwLock<Vec<Notification>>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(NotificationCenterInner {
                active: RwLock::new(Vec::new()),
                ttl,
            }),
        }
    }

    pub async fn raise(&self, message: impl Into<String>, severity: Severity) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            severity,
        };

        match severity {
            Severity::Error => warn!("Notification: {}", notification.message),
            Severity::Success | Severity::Info => info!("Notification: {}", notification.message),
        }

        self.inner.active.write().await.push(notification.clone());

        let center = self.clone();
        let id = notification.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(center.inner.ttl).await;
            center.dismiss(&id).await;
        });

        notification
    }

    /// Returns false if the notification had already expired or been dismissed.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut active = self.inner.active.write().await;
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.inner.active.read().await.clone()
    }
}

// -- Handlers --

pub async fn list_notifications(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(session.messenger.notifications().list().await)
}

pub async fn dismiss_notification(
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if session.messenger.notifications().dismiss(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("La notificación ya no existe."))
    }
}
