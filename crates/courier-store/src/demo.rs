//! Seed document for running without a spreadsheet.

use chrono::{DateTime, Utc};

use courier_types::models::{
    Contact, ContactStatus, Message, Post, ReactionCounts, Snapshot, User,
};

use crate::MemoryStore;

pub const DEMO_USER_PHONE: &str = "5555555555";
pub const DEMO_USER_PASSWORD: &str = "demo";
pub const SUPPORT_PHONE: &str = "000-000";

/// One ready-made account, the support contact already connected, its
/// welcome message and the launch announcement.
pub fn demo_snapshot(now: DateTime<Utc>) -> Snapshot {
    Snapshot {
        users: vec![User {
            name: "Usuario Principal".into(),
            phone: DEMO_USER_PHONE.into(),
            password: DEMO_USER_PASSWORD.into(),
        }],
        contacts: vec![Contact {
            name: "Soporte Técnico".into(),
            phone: SUPPORT_PHONE.into(),
            avatar_color: "bg-blue-500".into(),
            status: ContactStatus::Connected,
        }],
        messages: vec![Message {
            id: "1".into(),
            text: "¡Bienvenido a GeminiMsg! Aquí podrás chatear y ver noticias.".into(),
            image_url: None,
            timestamp: now,
            sender_id: SUPPORT_PHONE.into(),
            receiver_id: DEMO_USER_PHONE.into(),
        }],
        posts: vec![Post {
            id: "p1".into(),
            sender_id: SUPPORT_PHONE.into(),
            text: "Estamos lanzando la versión beta de la aplicación. ¡Esperamos que les guste!"
                .into(),
            timestamp: now,
            reactions: ReactionCounts {
                like: 5,
                dislike: 0,
                great: 2,
            },
            user_reaction: None,
        }],
        photos: Vec::new(),
    }
}

impl MemoryStore {
    /// A store holding [`demo_snapshot`].
    pub fn demo() -> Self {
        Self::new(demo_snapshot(Utc::now()))
    }
}
