use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::debug;
use uuid::Uuid;

use courier_types::models::{
    AVATAR_COLORS, Contact, ContactStatus, Message, Photo, PhotoReaction, PhotoReactionCounts,
    Post, PostReaction, ReactionCounts, Snapshot, User,
};

use crate::error::DomainError;
use crate::policy::Decision;
use crate::reactions;

/// Everything one logged-in user works with.
///
/// Mutations take the state by value and return the next state alongside
/// their outcome. Failed operations hand the state back unchanged.
#[derive(Debug, Clone)]
pub struct AppState {
    viewer: User,
    users: Vec<User>,
    contacts: Vec<Contact>,
    messages: Vec<Message>,
    posts: Vec<Post>,
    photos: Vec<Photo>,
}

/// A new contact the viewer wants to connect with.
#[derive(Debug, Clone)]
pub struct ConnectionRequest {
    pub name: String,
    pub phone: String,
    pub avatar_color: String,
    /// Sent as the first message of the thread when non-empty.
    pub greeting: Option<String>,
}

impl ConnectionRequest {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            avatar_color: random_avatar_color(),
            greeting: None,
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Inserted as pending; a resolution should be scheduled.
    Requested,
    /// A contact with this phone already exists. Nothing changed.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Rejected { removed_messages: usize },
}

pub fn random_avatar_color() -> String {
    AVATAR_COLORS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(AVATAR_COLORS[0])
        .to_string()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl AppState {
    pub fn new(viewer: User, snapshot: Snapshot) -> Self {
        Self {
            viewer,
            users: snapshot.users,
            contacts: snapshot.contacts,
            messages: snapshot.messages,
            posts: snapshot.posts,
            photos: snapshot.photos,
        }
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn contact(&self, phone: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.phone == phone)
    }

    /// The full document to write back to the remote store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.clone(),
            contacts: self.contacts.clone(),
            messages: self.messages.clone(),
            posts: self.posts.clone(),
            photos: self.photos.clone(),
        }
    }

    // -- Contact lifecycle --

    /// Add a pending contact at the front of the list. Duplicate phones are
    /// dropped without touching the state.
    pub fn request_connection(
        mut self,
        request: ConnectionRequest,
        now: DateTime<Utc>,
    ) -> (Self, RequestOutcome) {
        if self.contact(&request.phone).is_some() {
            debug!("Ignoring duplicate connection request for {}", request.phone);
            return (self, RequestOutcome::Duplicate);
        }

        self.contacts.insert(
            0,
            Contact {
                name: request.name,
                phone: request.phone.clone(),
                avatar_color: request.avatar_color,
                status: ContactStatus::Pending,
            },
        );

        if let Some(text) = request.greeting.filter(|g| !g.is_empty()) {
            self.messages.push(Message {
                id: new_id(),
                text,
                image_url: None,
                timestamp: now,
                sender_id: self.viewer.phone.clone(),
                receiver_id: request.phone,
            });
        }

        (self, RequestOutcome::Requested)
    }

    /// Apply the decision for `phone` to whatever state exists now.
    ///
    /// Accepting flips the contact to connected. Rejecting removes the contact
    /// and the viewer's outgoing messages to that phone; messages received
    /// from it are left in place.
    pub fn resolve_connection(mut self, phone: &str, decision: Decision) -> (Self, Resolution) {
        match decision {
            Decision::Accept => {
                for contact in self.contacts.iter_mut().filter(|c| c.phone == phone) {
                    contact.status = ContactStatus::Connected;
                }
                (self, Resolution::Accepted)
            }
            Decision::Reject => {
                self.contacts.retain(|c| c.phone != phone);

                let before = self.messages.len();
                let viewer = &self.viewer.phone;
                self.messages
                    .retain(|m| !(m.receiver_id == phone && &m.sender_id == viewer));
                let removed_messages = before - self.messages.len();

                (self, Resolution::Rejected { removed_messages })
            }
        }
    }

    /// Look up a contact whose thread may be opened.
    pub fn open_chat(&self, phone: &str) -> Result<&Contact, DomainError> {
        let contact = self
            .contact(phone)
            .ok_or_else(|| DomainError::UnknownContact(phone.to_string()))?;

        if !contact.is_connected() {
            return Err(DomainError::ContactPending(phone.to_string()));
        }
        Ok(contact)
    }

    // -- Messages --

    pub fn send_message(
        mut self,
        receiver: &str,
        text: String,
        image_url: Option<String>,
        now: DateTime<Utc>,
    ) -> (Self, Result<Message, DomainError>) {
        if let Err(e) = self.open_chat(receiver).map(|_| ()) {
            return (self, Err(e));
        }

        let image_url = image_url.filter(|u| !u.trim().is_empty());
        if text.trim().is_empty() && image_url.is_none() {
            return (self, Err(DomainError::EmptyMessage));
        }

        let message = Message {
            id: new_id(),
            text,
            image_url,
            timestamp: now,
            sender_id: self.viewer.phone.clone(),
            receiver_id: receiver.to_string(),
        };
        self.messages.push(message.clone());
        (self, Ok(message))
    }

    /// Record a message from `sender` to the viewer.
    pub fn receive_message(
        mut self,
        sender: &str,
        text: String,
        now: DateTime<Utc>,
    ) -> (Self, Message) {
        let message = Message {
            id: new_id(),
            text,
            image_url: None,
            timestamp: now,
            sender_id: sender.to_string(),
            receiver_id: self.viewer.phone.clone(),
        };
        self.messages.push(message.clone());
        (self, message)
    }

    // -- Announcements --

    pub fn create_post(mut self, text: String, now: DateTime<Utc>) -> (Self, Result<Post, DomainError>) {
        if text.trim().is_empty() {
            return (self, Err(DomainError::EmptyPost));
        }

        let post = Post {
            id: new_id(),
            sender_id: self.viewer.phone.clone(),
            text,
            timestamp: now,
            reactions: ReactionCounts::default(),
            user_reaction: None,
        };
        self.posts.insert(0, post.clone());
        (self, Ok(post))
    }

    pub fn toggle_post_reaction(
        mut self,
        post_id: &str,
        kind: PostReaction,
    ) -> (Self, Result<Post, DomainError>) {
        let result = match self.posts.iter_mut().find(|p| p.id == post_id) {
            Some(post) => {
                reactions::toggle_post_reaction(post, kind);
                Ok(post.clone())
            }
            None => Err(DomainError::UnknownPost(post_id.to_string())),
        };
        (self, result)
    }

    // -- Gallery --

    pub fn add_photo(mut self, url: String) -> (Self, Photo) {
        let photo = Photo {
            id: new_id(),
            owner_id: self.viewer.phone.clone(),
            url,
            reactions: PhotoReactionCounts::default(),
        };
        self.photos.insert(0, photo.clone());
        (self, photo)
    }

    pub fn delete_photo(mut self, photo_id: &str) -> (Self, Result<Photo, DomainError>) {
        let Some(idx) = self.photos.iter().position(|p| p.id == photo_id) else {
            return (self, Err(DomainError::UnknownPhoto(photo_id.to_string())));
        };
        if self.photos[idx].owner_id != self.viewer.phone {
            return (self, Err(DomainError::NotPhotoOwner));
        }
        let photo = self.photos.remove(idx);
        (self, Ok(photo))
    }

    pub fn react_to_photo(
        mut self,
        photo_id: &str,
        kind: PhotoReaction,
    ) -> (Self, Result<Photo, DomainError>) {
        let result = match self.photos.iter_mut().find(|p| p.id == photo_id) {
            Some(photo) => {
                reactions::react_to_photo(photo, kind);
                Ok(photo.clone())
            }
            None => Err(DomainError::UnknownPhoto(photo_id.to_string())),
        };
        (self, result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn viewer() -> User {
        User {
            name: "Ana".into(),
            phone: "111".into(),
            password: "secret".into(),
        }
    }

    pub(crate) fn fresh_state() -> AppState {
        AppState::new(viewer(), Snapshot::default())
    }

    #[test]
    fn request_inserts_pending_contact_with_greeting() {
        let (state, outcome) = fresh_state().request_connection(
            ConnectionRequest::new("Bea", "222").with_greeting("Hi"),
            Utc::now(),
        );

        assert_eq!(outcome, RequestOutcome::Requested);
        assert_eq!(state.contacts().len(), 1);
        assert_eq!(state.contacts()[0].phone, "222");
        assert_eq!(state.contacts()[0].status, ContactStatus::Pending);
        assert!(AVATAR_COLORS.contains(&state.contacts()[0].avatar_color.as_str()));

        assert_eq!(state.messages().len(), 1);
        let m = &state.messages()[0];
        assert_eq!((m.sender_id.as_str(), m.receiver_id.as_str(), m.text.as_str()), ("111", "222", "Hi"));
    }

    #[test]
    fn new_requests_go_to_the_front() {
        let now = Utc::now();
        let (state, _) = fresh_state().request_connection(ConnectionRequest::new("Bea", "222"), now);
        let (state, _) = state.request_connection(ConnectionRequest::new("Cris", "333"), now);

        let phones: Vec<&str> = state.contacts().iter().map(|c| c.phone.as_str()).collect();
        assert_eq!(phones, ["333", "222"]);
        assert!(state.messages().is_empty());
    }

    #[test]
    fn duplicate_request_changes_nothing() {
        let now = Utc::now();
        let (state, _) = fresh_state()
            .request_connection(ConnectionRequest::new("Bea", "222").with_greeting("Hi"), now);
        let (state, _) = state.resolve_connection("222", Decision::Accept);
        let contacts_before = state.contacts().to_vec();
        let messages_before = state.messages().to_vec();

        let (state, outcome) = state.request_connection(
            ConnectionRequest::new("Other name", "222").with_greeting("Hello again"),
            now,
        );

        assert_eq!(outcome, RequestOutcome::Duplicate);
        assert_eq!(state.contacts(), contacts_before.as_slice());
        assert_eq!(state.messages(), messages_before.as_slice());
    }

    #[test]
    fn empty_greeting_sends_nothing() {
        let (state, _) = fresh_state()
            .request_connection(ConnectionRequest::new("Bea", "222").with_greeting(""), Utc::now());
        assert!(state.messages().is_empty());
    }

    #[test]
    fn accept_connects_and_unblocks_chat() {
        let (state, _) = fresh_state()
            .request_connection(ConnectionRequest::new("Bea", "222").with_greeting("Hi"), Utc::now());
        assert_eq!(
            state.open_chat("222").unwrap_err(),
            DomainError::ContactPending("222".into())
        );

        let (state, resolution) = state.resolve_connection("222", Decision::Accept);
        assert_eq!(resolution, Resolution::Accepted);
        assert_eq!(state.contact("222").unwrap().status, ContactStatus::Connected);
        assert!(state.open_chat("222").is_ok());
    }

    #[test]
    fn reject_prunes_only_outgoing_messages() {
        let now = Utc::now();
        let (state, _) = fresh_state()
            .request_connection(ConnectionRequest::new("Bea", "222").with_greeting("Hi"), now);
        let (state, _) = state.receive_message("222", "hola Ana".into(), now);
        let (state, _) = state.receive_message("000-000", "soporte".into(), now);

        let (state, resolution) = state.resolve_connection("222", Decision::Reject);

        assert_eq!(resolution, Resolution::Rejected { removed_messages: 1 });
        assert!(state.contact("222").is_none());
        let texts: Vec<&str> = state.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["hola Ana", "soporte"]);
    }

    #[test]
    fn resolution_for_missing_contact_is_harmless() {
        let (state, resolution) = fresh_state().resolve_connection("999", Decision::Accept);
        assert_eq!(resolution, Resolution::Accepted);
        assert!(state.contacts().is_empty());

        let (_, resolution) = fresh_state().resolve_connection("999", Decision::Reject);
        assert_eq!(resolution, Resolution::Rejected { removed_messages: 0 });
    }

    #[test]
    fn accept_never_reverts_to_pending() {
        let (state, _) = fresh_state().request_connection(ConnectionRequest::new("Bea", "222"), Utc::now());
        let (state, _) = state.resolve_connection("222", Decision::Accept);
        let (state, _) = state.resolve_connection("222", Decision::Accept);
        assert_eq!(state.contact("222").unwrap().status, ContactStatus::Connected);
    }

    #[test]
    fn sending_requires_connected_contact() {
        let now = Utc::now();
        let (state, result) = fresh_state().send_message("222", "hola".into(), None, now);
        assert_eq!(result.unwrap_err(), DomainError::UnknownContact("222".into()));

        let (state, _) = state.request_connection(ConnectionRequest::new("Bea", "222"), now);
        let (state, result) = state.send_message("222", "hola".into(), None, now);
        assert_eq!(result.unwrap_err(), DomainError::ContactPending("222".into()));
        assert!(state.messages().is_empty());

        let (state, _) = state.resolve_connection("222", Decision::Accept);
        let (state, result) = state.send_message("222", "  ".into(), None, now);
        assert_eq!(result.unwrap_err(), DomainError::EmptyMessage);

        let (state, result) =
            state.send_message("222", String::new(), Some("data:image/png;base64,AAAA".into()), now);
        let message = result.unwrap();
        assert_eq!(message.sender_id, "111");
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn posts_are_prepended_with_zero_counts() {
        let now = Utc::now();
        let (state, first) = fresh_state().create_post("uno".into(), now);
        let (state, second) = state.create_post("dos".into(), now);
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(state.posts()[0].id, second.id);
        assert_eq!(state.posts()[1].id, first.id);
        assert_eq!(second.reactions, ReactionCounts::default());
        assert_eq!(second.user_reaction, None);

        let (_, result) = state.create_post("   ".into(), now);
        assert_eq!(result.unwrap_err(), DomainError::EmptyPost);
    }

    #[test]
    fn toggle_reaction_through_state() {
        let (state, post) = fresh_state().create_post("beta".into(), Utc::now());
        let id = post.unwrap().id;

        let (state, post) = state.toggle_post_reaction(&id, PostReaction::Like);
        let post = post.unwrap();
        assert_eq!((post.reactions.like, post.user_reaction), (1, Some(PostReaction::Like)));

        let (state, post) = state.toggle_post_reaction(&id, PostReaction::Like);
        let post = post.unwrap();
        assert_eq!((post.reactions.like, post.user_reaction), (0, None));
        assert_eq!(state.posts()[0], post);

        let (_, missing) = state.toggle_post_reaction("nope", PostReaction::Great);
        assert_eq!(missing.unwrap_err(), DomainError::UnknownPost("nope".into()));
    }

    #[test]
    fn only_owner_deletes_photos() {
        let mut snapshot = Snapshot::default();
        snapshot.photos.push(Photo {
            id: "theirs".into(),
            owner_id: "222".into(),
            url: "https://example.com/b.jpg".into(),
            reactions: PhotoReactionCounts::default(),
        });
        let state = AppState::new(viewer(), snapshot);
        let (state, mine) = state.add_photo("https://example.com/a.jpg".into());
        assert_eq!(state.photos()[0].id, mine.id);

        let (state, result) = state.delete_photo("theirs");
        assert_eq!(result.unwrap_err(), DomainError::NotPhotoOwner);

        let (state, result) = state.delete_photo(&mine.id);
        assert_eq!(result.unwrap().id, mine.id);
        assert_eq!(state.photos().len(), 1);

        let (_, result) = state.delete_photo(&mine.id);
        assert!(matches!(result, Err(DomainError::UnknownPhoto(_))));
    }

    #[test]
    fn photo_reactions_through_state() {
        let (state, photo) = fresh_state().add_photo("https://example.com/a.jpg".into());
        let (state, _) = state.react_to_photo(&photo.id, PhotoReaction::Like);
        let (_, updated) = state.react_to_photo(&photo.id, PhotoReaction::Like);
        assert_eq!(updated.unwrap().reactions.like, 2);
    }

    #[test]
    fn snapshot_round_trips_collections() {
        let (state, _) = fresh_state()
            .request_connection(ConnectionRequest::new("Bea", "222").with_greeting("Hi"), Utc::now());
        let snapshot = state.snapshot();
        assert_eq!(snapshot.contacts.len(), 1);
        assert_eq!(snapshot.messages.len(), 1);

        let restored = AppState::new(viewer(), snapshot.clone());
        assert_eq!(restored.snapshot(), snapshot);
    }
}
