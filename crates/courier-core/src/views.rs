use std::cmp::Reverse;

use courier_types::models::{ChatPreview, Message, Photo, Post};

use crate::state::AppState;
use crate::visibility::is_visible;

impl AppState {
    pub fn visible_posts(&self) -> Vec<Post> {
        let viewer = &self.viewer().phone;
        self.posts()
            .iter()
            .filter(|p| is_visible(&p.sender_id, viewer, self.contacts()))
            .cloned()
            .collect()
    }

    pub fn visible_photos(&self) -> Vec<Photo> {
        let viewer = &self.viewer().phone;
        self.photos()
            .iter()
            .filter(|p| is_visible(&p.owner_id, viewer, self.contacts()))
            .cloned()
            .collect()
    }

    /// Visible photos owned by `phone`.
    pub fn contact_photos(&self, phone: &str) -> Vec<Photo> {
        self.visible_photos()
            .into_iter()
            .filter(|p| p.owner_id == phone)
            .collect()
    }

    /// Messages between the viewer and `phone`, oldest first.
    pub fn thread(&self, phone: &str) -> Vec<Message> {
        let viewer = &self.viewer().phone;
        let mut messages: Vec<Message> = self
            .messages()
            .iter()
            .filter(|m| m.is_between(viewer, phone))
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Chat list rows, most recent conversation first.
    ///
    /// Contacts without any exchanged message are left out. Pending contacts
    /// that already received a greeting are included. `search` matches the
    /// contact name case-insensitively or any part of the phone.
    pub fn chat_previews(&self, search: Option<&str>) -> Vec<ChatPreview> {
        let viewer = &self.viewer().phone;
        let term = search.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

        let mut previews: Vec<ChatPreview> = self
            .contacts()
            .iter()
            .filter(|c| match &term {
                Some(term) => c.name.to_lowercase().contains(term) || c.phone.contains(term.as_str()),
                None => true,
            })
            .filter_map(|contact| {
                let last = self
                    .messages()
                    .iter()
                    .filter(|m| m.is_between(viewer, &contact.phone))
                    .max_by_key(|m| m.timestamp)?;
                Some(ChatPreview {
                    contact: contact.clone(),
                    last_message: last.clone(),
                })
            })
            .collect();

        previews.sort_by_key(|p| Reverse(p.last_message.timestamp));
        previews
    }
}
