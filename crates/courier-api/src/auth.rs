use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use courier_core::{AcceptancePolicy, AppState, auth};
use courier_greeting::Greeter;
use courier_store::{MemoryStore, RemoteStore, SheetsStore, sanitize_url};
use courier_types::api::{LoginRequest, RegisterRequest, SessionResponse, UserProfile};
use courier_types::models::{Snapshot, User};

use crate::error::ApiError;
use crate::messenger::{Collaborators, Messenger, MessengerConfig};
use crate::middleware::Session;
use crate::sessions::Sessions;

const MISSING_STORE_URL: &str = "Por favor ingresa la URL de tu Google Apps Script.";
const SAVE_USER_FAILED: &str = "Error al guardar el usuario en la base de datos.";

/// Default store URL reported in demo mode; never dialed.
pub const DEMO_STORE_URL: &str = "memory://demo";

/// Builds the store client for a sanitized endpoint URL.
pub type StoreConnector = Arc<dyn Fn(&str) -> Arc<dyn RemoteStore> + Send + Sync>;

pub type ApiState = Arc<ApiStateInner>;

pub struct ApiStateInner {
    pub sessions: Sessions,
    /// Used when a login or registration does not name its own store.
    pub default_store_url: Option<String>,
    pub connect_store: StoreConnector,
    pub greeter: Arc<dyn Greeter>,
    pub policy: Arc<dyn AcceptancePolicy>,
    pub config: MessengerConfig,
}

impl ApiStateInner {
    /// State wired to real spreadsheet endpoints.
    pub fn new(
        default_store_url: Option<String>,
        greeter: Arc<dyn Greeter>,
        policy: Arc<dyn AcceptancePolicy>,
        config: MessengerConfig,
    ) -> Self {
        let client = reqwest::Client::new();
        Self {
            sessions: Sessions::new(),
            default_store_url,
            connect_store: Arc::new(move |url: &str| -> Arc<dyn RemoteStore> {
                Arc::new(SheetsStore::with_client(client.clone(), url))
            }),
            greeter,
            policy,
            config,
        }
    }

    /// State backed by one in-process store shared by every session. Store
    /// URLs sent by clients are ignored.
    pub fn demo(
        store: MemoryStore,
        greeter: Arc<dyn Greeter>,
        policy: Arc<dyn AcceptancePolicy>,
        config: MessengerConfig,
    ) -> Self {
        Self {
            sessions: Sessions::new(),
            default_store_url: Some(DEMO_STORE_URL.to_string()),
            connect_store: Arc::new(move |_url: &str| -> Arc<dyn RemoteStore> {
                Arc::new(store.clone())
            }),
            greeter,
            policy,
            config,
        }
    }

    fn store_for(&self, requested: Option<&str>) -> Result<Arc<dyn RemoteStore>, ApiError> {
        let url = requested
            .map(sanitize_url)
            .filter(|url| !url.is_empty())
            .or_else(|| self.default_store_url.as_deref().map(sanitize_url))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_STORE_URL))?;
        Ok((self.connect_store)(&url))
    }

    async fn open_session(
        &self,
        user: User,
        snapshot: Snapshot,
        store: Arc<dyn RemoteStore>,
    ) -> SessionResponse {
        let profile = UserProfile::from(&user);
        let messenger = Messenger::new(
            AppState::new(user, snapshot),
            Collaborators {
                store,
                greeter: self.greeter.clone(),
                policy: self.policy.clone(),
            },
            self.config.clone(),
        );
        let token = self.sessions.open(messenger).await;
        SessionResponse {
            token,
            user: profile,
        }
    }
}

pub async fn register(
    State(state): State<ApiState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store_for(req.store_url.as_deref())?;
    let snapshot = store.fetch_all().await.ok_or_else(ApiError::store_unavailable)?;

    let (user, snapshot) = auth::register(snapshot, &req.name, &req.phone, &req.password)?;

    if !store.replace_all(&snapshot).await {
        warn!("Could not save new user {}", user.phone);
        return Err(ApiError::new(StatusCode::BAD_GATEWAY, SAVE_USER_FAILED));
    }
    info!("Registered user {}", user.phone);

    let session = state.open_session(user, snapshot, store).await;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store_for(req.store_url.as_deref())?;
    let snapshot = store.fetch_all().await.ok_or_else(ApiError::store_unavailable)?;

    let user = auth::login(&snapshot, &req.phone, &req.password)?;
    info!("User {} logged in", user.phone);

    Ok(Json(state.open_session(user, snapshot, store).await))
}

pub async fn logout(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    state.sessions.close(&session.token).await;
    StatusCode::NO_CONTENT
}
