use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use courier_core::policy::AcceptancePolicy;
use courier_core::{AppState, ConnectionRequest, Decision, DomainError, RequestOutcome, Resolution};
use courier_greeting::Greeter;
use courier_store::RemoteStore;
use courier_types::models::{
    ChatPreview, Contact, ContactStatus, Message, Photo, PhotoReaction, Post, PostReaction,
    Severity, Snapshot, User,
};

use crate::notifications::NotificationCenter;

pub const SUPPORT_AUTO_REPLY: &str = "Gracias por tu mensaje. Un agente te atenderá pronto.";

#[derive(Debug, Clone)]
pub struct MessengerConfig {
    /// Time before a pending request is resolved.
    pub resolution_delay: Duration,
    /// Messages to this phone get an automatic reply.
    pub support_phone: String,
    pub support_reply_delay: Duration,
    pub notification_ttl: Duration,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            resolution_delay: Duration::from_secs(4),
            support_phone: "000-000".to_string(),
            support_reply_delay: Duration::from_secs(1),
            notification_ttl: Duration::from_secs(5),
        }
    }
}

/// External collaborators a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn RemoteStore>,
    pub greeter: Arc<dyn Greeter>,
    pub policy: Arc<dyn AcceptancePolicy>,
}

/// Controller for one logged-in session.
///
/// Owns the session's `AppState`; every change goes through a state
/// transition applied under the lock. After each successful change the whole
/// document is handed to a single background writer, which always writes the
/// newest snapshot and never two at once. Timers spawned here cannot be
/// cancelled and act on whatever state exists when they fire; once the
/// session is closed their changes are no longer written back.
#[derive(Clone)]
pub struct Messenger {
    inner: Arc<MessengerInner>,
}

struct MessengerInner {
    viewer: User,
    state: Mutex<AppState>,
    collaborators: Collaborators,
    notifications: NotificationCenter,
    config: MessengerConfig,

    /// Newest snapshot not yet written. Drained by `write_back`.
    sync: watch::Sender<Option<Snapshot>>,

    closed: AtomicBool,
}

impl Messenger {
    /// Must be called from within a tokio runtime; spawns the session's writer.
    pub fn new(state: AppState, collaborators: Collaborators, config: MessengerConfig) -> Self {
        let (sync, pending) = watch::channel(None);
        tokio::spawn(write_back(collaborators.store.clone(), pending));

        Self {
            inner: Arc::new(MessengerInner {
                viewer: state.viewer().clone(),
                state: Mutex::new(state),
                collaborators,
                notifications: NotificationCenter::new(config.notification_ttl),
                config,
                sync,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn viewer(&self) -> &User {
        &self.inner.viewer
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    /// Run a read-only view against the current state.
    pub async fn read<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        let state = self.inner.state.lock().await;
        f(&state)
    }

    async fn update<T>(&self, f: impl FnOnce(AppState) -> (AppState, T)) -> T {
        let mut state = self.inner.state.lock().await;
        // Transitions hand the state back whole, failed ones included.
        let placeholder = AppState::new(self.inner.viewer.clone(), Snapshot::default());
        let current = std::mem::replace(&mut *state, placeholder);
        let (next, outcome) = f(current);
        *state = next;
        outcome
    }

    /// Queue the whole document for writing. Returns without waiting for the
    /// store; a snapshot still queued when a newer one arrives is skipped.
    async fn persist(&self) {
        if self.is_closed() {
            debug!("Session for {} is closed; not syncing", self.inner.viewer.phone);
            return;
        }
        let state = self.inner.state.lock().await;
        self.inner.sync.send_replace(Some(state.snapshot()));
    }

    /// Stop writing this session's changes to the store.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    // -- Contacts --

    pub async fn contacts(&self) -> Vec<Contact> {
        self.read(|s| s.contacts().to_vec()).await
    }

    /// Send a connection request. When `greeting` is `None` one is generated.
    ///
    /// A request for a phone already in the contact list is dropped: no
    /// greeting, no notification, no timer.
    pub async fn add_contact(
        &self,
        name: &str,
        phone: &str,
        greeting: Option<String>,
    ) -> Result<RequestOutcome, DomainError> {
        let (name, phone) = (name.trim(), phone.trim());
        if name.is_empty() || phone.is_empty() {
            return Err(DomainError::MissingContactFields);
        }

        if self.read(|s| s.contact(phone).is_some()).await {
            debug!("Contact {} already exists", phone);
            return Ok(RequestOutcome::Duplicate);
        }

        let greeting = match greeting {
            Some(greeting) => greeting,
            None => {
                self.inner
                    .collaborators
                    .greeter
                    .greeting(&self.inner.viewer.name, name)
                    .await
            }
        };

        let request = ConnectionRequest::new(name, phone).with_greeting(greeting);
        let pending = Contact {
            name: request.name.clone(),
            phone: request.phone.clone(),
            avatar_color: request.avatar_color.clone(),
            status: ContactStatus::Pending,
        };

        let outcome = self
            .update(|s| s.request_connection(request, Utc::now()))
            .await;

        if outcome == RequestOutcome::Requested {
            info!("Connection request sent to {}", phone);
            self.inner
                .notifications
                .raise(format!("Solicitud enviada a {name}."), Severity::Info)
                .await;
            self.persist().await;
            self.schedule_resolution(pending);
        }

        Ok(outcome)
    }

    fn schedule_resolution(&self, contact: Contact) {
        let messenger = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(messenger.inner.config.resolution_delay).await;
            let decision = messenger.inner.collaborators.policy.decide(&contact);
            messenger.resolve(&contact, decision).await;
        });
    }

    /// Apply a resolution decision now, as the timer would.
    pub async fn resolve(&self, contact: &Contact, decision: Decision) -> Resolution {
        let resolution = self
            .update(|s| s.resolve_connection(&contact.phone, decision))
            .await;

        match resolution {
            Resolution::Accepted => {
                info!("{} accepted the connection request", contact.phone);
                self.inner
                    .notifications
                    .raise(format!("{} aceptó tu solicitud.", contact.name), Severity::Success)
                    .await;
            }
            Resolution::Rejected { removed_messages } => {
                info!(
                    "{} rejected the connection request; pruned {} messages",
                    contact.phone, removed_messages
                );
                self.inner
                    .notifications
                    .raise(format!("{} rechazó tu solicitud.", contact.name), Severity::Error)
                    .await;
            }
        }

        self.persist().await;
        resolution
    }

    // -- Chats --

    pub async fn chat_previews(&self, search: Option<&str>) -> Vec<ChatPreview> {
        self.read(|s| s.chat_previews(search)).await
    }

    /// Open the thread with `phone`. Pending contacts are refused.
    pub async fn open_chat(&self, phone: &str) -> Result<Vec<Message>, DomainError> {
        self.read(|s| s.open_chat(phone).map(|_| s.thread(phone)))
            .await
    }

    pub async fn send_message(
        &self,
        receiver: &str,
        text: String,
        image_url: Option<String>,
    ) -> Result<Message, DomainError> {
        let message = self
            .update(|s| s.send_message(receiver, text, image_url, Utc::now()))
            .await?;
        self.persist().await;

        if receiver == self.inner.config.support_phone {
            self.schedule_support_reply(receiver.to_string());
        }
        Ok(message)
    }

    fn schedule_support_reply(&self, support: String) {
        let messenger = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(messenger.inner.config.support_reply_delay).await;
            messenger
                .update(|s| s.receive_message(&support, SUPPORT_AUTO_REPLY.to_string(), Utc::now()))
                .await;
            messenger.persist().await;
        });
    }

    // -- Announcements --

    pub async fn visible_posts(&self) -> Vec<Post> {
        self.read(AppState::visible_posts).await
    }

    pub async fn create_post(&self, text: String) -> Result<Post, DomainError> {
        let post = self.update(|s| s.create_post(text, Utc::now())).await?;
        self.persist().await;
        Ok(post)
    }

    pub async fn toggle_post_reaction(
        &self,
        post_id: &str,
        kind: PostReaction,
    ) -> Result<Post, DomainError> {
        let post = self.update(|s| s.toggle_post_reaction(post_id, kind)).await?;
        self.persist().await;
        Ok(post)
    }

    // -- Gallery --

    pub async fn visible_photos(&self) -> Vec<Photo> {
        self.read(AppState::visible_photos).await
    }

    pub async fn contact_photos(&self, phone: &str) -> Vec<Photo> {
        self.read(|s| s.contact_photos(phone)).await
    }

    pub async fn add_photo(&self, url: String) -> Photo {
        let photo = self.update(|s| s.add_photo(url)).await;
        self.persist().await;
        photo
    }

    pub async fn delete_photo(&self, photo_id: &str) -> Result<Photo, DomainError> {
        let photo = self.update(|s| s.delete_photo(photo_id)).await?;
        self.persist().await;
        Ok(photo)
    }

    pub async fn react_to_photo(
        &self,
        photo_id: &str,
        kind: PhotoReaction,
    ) -> Result<Photo, DomainError> {
        let photo = self.update(|s| s.react_to_photo(photo_id, kind)).await?;
        self.persist().await;
        Ok(photo)
    }
}

async fn write_back(store: Arc<dyn RemoteStore>, mut pending: watch::Receiver<Option<Snapshot>>) {
    while pending.changed().await.is_ok() {
        let snapshot = pending.borrow_and_update().clone();
        if let Some(snapshot) = snapshot {
            if !store.replace_all(&snapshot).await {
                warn!("Sync to remote store failed; continuing with local state");
            }
        }
    }
}
