use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use crate::auth::{self, ApiState};
use crate::middleware::require_session;
use crate::photos::MAX_PHOTO_SIZE;
use crate::{contacts, messages, notifications, photos, posts, reactions};

/// Every route the server exposes. CORS and tracing layers are added by the
/// binary.
pub fn router(state: ApiState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let photo_routes = Router::new()
        .route("/photos", get(photos::list_photos).post(photos::upload_photo))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/contacts", get(contacts::list_contacts).post(contacts::add_contact))
        .route("/contacts/{phone}/photos", get(contacts::contact_photos))
        .route("/chats", get(messages::list_chats))
        .route(
            "/chats/{phone}/messages",
            get(messages::get_messages).post(messages::send_message),
        )
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/{post_id}/reactions", post(reactions::react_to_post))
        .merge(photo_routes)
        .route("/photos/{photo_id}", delete(photos::delete_photo))
        .route("/photos/{photo_id}/reactions", post(reactions::react_to_photo))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{id}", delete(notifications::dismiss_notification))
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
