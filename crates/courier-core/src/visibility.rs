use courier_types::models::Contact;

/// Content is visible to `viewer` when the viewer wrote it or the author is a
/// connected contact. Evaluated on every read.
pub fn is_visible(author: &str, viewer: &str, contacts: &[Contact]) -> bool {
    author == viewer
        || contacts
            .iter()
            .find(|c| c.phone == author)
            .is_some_and(Contact::is_connected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::models::ContactStatus;

    fn contact(phone: &str, status: ContactStatus) -> Contact {
        Contact {
            name: format!("c{phone}"),
            phone: phone.into(),
            avatar_color: "bg-pink-500".into(),
            status,
        }
    }

    #[test]
    fn own_content_is_always_visible() {
        assert!(is_visible("111", "111", &[]));
    }

    #[test]
    fn pending_and_unknown_authors_are_hidden() {
        let contacts = [contact("222", ContactStatus::Pending)];
        assert!(!is_visible("222", "111", &contacts));
        assert!(!is_visible("333", "111", &contacts));
    }

    #[test]
    fn connected_authors_are_visible() {
        let contacts = [contact("222", ContactStatus::Connected)];
        assert!(is_visible("222", "111", &contacts));
    }
}
