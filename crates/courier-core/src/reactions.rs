//! Reaction models for posts and photos.
//!
//! Posts remember one reaction per viewer and toggle it. Photos keep no
//! per-viewer memory: every reaction just bumps a shared counter.

use courier_types::models::{Photo, PhotoReaction, Post, PostReaction};

/// Toggle the viewer's reaction on a post.
///
/// Same kind as the recorded one: un-react. Otherwise the new kind is counted,
/// the previous kind (if any) is released, and the new kind becomes the
/// viewer's reaction.
pub fn toggle_post_reaction(post: &mut Post, kind: PostReaction) {
    match post.user_reaction {
        Some(current) if current == kind => {
            post.reactions.decrement(kind);
            post.user_reaction = None;
        }
        previous => {
            post.reactions.increment(kind);
            if let Some(previous) = previous {
                post.reactions.decrement(previous);
            }
            post.user_reaction = Some(kind);
        }
    }
}

/// Count one more reaction of `kind` on a photo. There is no undo.
pub fn react_to_photo(photo: &mut Photo, kind: PhotoReaction) {
    photo.reactions.increment(kind);
}
