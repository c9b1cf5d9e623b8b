use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The phone number is the unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub phone: String,
    /// Stored in plaintext by the spreadsheet backend. Seed rows may omit it.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Pending,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub avatar_color: String,
    pub status: ContactStatus,
}

impl Contact {
    pub fn is_connected(&self) -> bool {
        self.status == ContactStatus::Connected
    }
}

/// Palette used for contact avatars.
pub const AVATAR_COLORS: [&str; 6] = [
    "bg-red-500",
    "bg-blue-500",
    "bg-green-500",
    "bg-yellow-500",
    "bg-purple-500",
    "bg-pink-500",
];

/// A chat message. Thread membership is the (sender, receiver) phone pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub sender_id: String,
    pub receiver_id: String,
}

impl Message {
    /// True if the message was exchanged between `a` and `b`, in either direction.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

/// One row of the chat list: a contact and the latest message exchanged with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPreview {
    pub contact: Contact,
    pub last_message: Message,
}

// -- Reactions --

/// Reaction kinds available on announcement posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostReaction {
    Like,
    Dislike,
    Great,
}

/// Reaction kinds available on gallery photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoReaction {
    Like,
    Love,
    Dislike,
}

/// Per-kind counters for a post. Counters never go below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    #[serde(default)]
    pub like: u32,
    #[serde(default)]
    pub dislike: u32,
    #[serde(default)]
    pub great: u32,
}

impl ReactionCounts {
    pub fn get(&self, kind: PostReaction) -> u32 {
        match kind {
            PostReaction::Like => self.like,
            PostReaction::Dislike => self.dislike,
            PostReaction::Great => self.great,
        }
    }

    fn slot(&mut self, kind: PostReaction) -> &mut u32 {
        match kind {
            PostReaction::Like => &mut self.like,
            PostReaction::Dislike => &mut self.dislike,
            PostReaction::Great => &mut self.great,
        }
    }

    pub fn increment(&mut self, kind: PostReaction) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }

    /// Decrement, flooring at zero.
    pub fn decrement(&mut self, kind: PostReaction) {
        let slot = self.slot(kind);
        *slot = slot.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoReactionCounts {
    #[serde(default)]
    pub like: u32,
    #[serde(default)]
    pub love: u32,
    #[serde(default)]
    pub dislike: u32,
}

impl PhotoReactionCounts {
    pub fn get(&self, kind: PhotoReaction) -> u32 {
        match kind {
            PhotoReaction::Like => self.like,
            PhotoReaction::Love => self.love,
            PhotoReaction::Dislike => self.dislike,
        }
    }

    pub fn increment(&mut self, kind: PhotoReaction) {
        let slot = match kind {
            PhotoReaction::Like => &mut self.like,
            PhotoReaction::Love => &mut self.love,
            PhotoReaction::Dislike => &mut self.dislike,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.like + self.love + self.dislike
    }
}

// -- Feed & gallery --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reactions: ReactionCounts,
    /// The viewer's own reaction, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reaction: Option<PostReaction>,
}

/// A gallery photo. `url` is either a remote URL or a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub owner_id: String,
    pub url: String,
    #[serde(default)]
    pub reactions: PhotoReactionCounts,
}

// -- Notifications --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

// -- Remote document --

/// The whole remote document, read and written in one piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_floors_at_zero() {
        let mut counts = ReactionCounts::default();
        counts.decrement(PostReaction::Great);
        assert_eq!(counts.great, 0);

        counts.increment(PostReaction::Great);
        counts.decrement(PostReaction::Great);
        counts.decrement(PostReaction::Great);
        assert_eq!(counts.great, 0);
    }

    #[test]
    fn snapshot_tolerates_missing_collections() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"users":[{"name":"Ana","phone":"111"}]}"#).unwrap();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.users[0].password, "");
        assert!(snapshot.contacts.is_empty());
        assert!(snapshot.photos.is_empty());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let contact = Contact {
            name: "Bea".into(),
            phone: "222".into(),
            avatar_color: "bg-red-500".into(),
            status: ContactStatus::Pending,
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["avatarColor"], "bg-red-500");
        assert_eq!(json["status"], "pending");

        let post: Post = serde_json::from_str(
            r#"{"id":"p1","senderId":"000-000","text":"beta","timestamp":"2024-05-01T10:00:00Z",
                "reactions":{"like":5,"dislike":0,"great":2}}"#,
        )
        .unwrap();
        assert_eq!(post.reactions.get(PostReaction::Like), 5);
        assert_eq!(post.user_reaction, None);
    }

    #[test]
    fn notification_severity_serializes_as_type() {
        let n = Notification {
            id: "n1".into(),
            message: "hola".into(),
            severity: Severity::Error,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "error");
    }
}
