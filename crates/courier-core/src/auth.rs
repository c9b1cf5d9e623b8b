//! Registration and login against the user list of a fetched snapshot.
//!
//! Passwords are compared in plaintext; the spreadsheet backend stores them
//! that way.

use courier_types::models::{Snapshot, User};

use crate::error::AuthError;

/// Append a new user to `snapshot`. The caller persists the returned snapshot.
pub fn register(
    mut snapshot: Snapshot,
    name: &str,
    phone: &str,
    password: &str,
) -> Result<(User, Snapshot), AuthError> {
    let (name, phone) = (name.trim(), phone.trim());
    if name.is_empty() || phone.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    if snapshot.users.iter().any(|u| u.phone == phone) {
        return Err(AuthError::PhoneTaken);
    }

    let user = User {
        name: name.to_string(),
        phone: phone.to_string(),
        password: password.to_string(),
    };
    snapshot.users.push(user.clone());
    Ok((user, snapshot))
}

pub fn login(snapshot: &Snapshot, phone: &str, password: &str) -> Result<User, AuthError> {
    let phone = phone.trim();
    if phone.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    snapshot
        .users
        .iter()
        .find(|u| u.phone == phone && u.password == password)
        .cloned()
        .ok_or(AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_ana() -> Snapshot {
        let (_, snapshot) = register(Snapshot::default(), "Ana", "111", "pw").unwrap();
        snapshot
    }

    #[test]
    fn register_appends_user() {
        let snapshot = snapshot_with_ana();
        let (user, snapshot) = register(snapshot, " Bea ", "222", "pw2").unwrap();

        assert_eq!(user.name, "Bea");
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.users[1], user);
    }

    #[test]
    fn register_rejects_taken_phone() {
        let snapshot = snapshot_with_ana();
        let err = register(snapshot.clone(), "Otra", "111", "x").unwrap_err();
        assert_eq!(err, AuthError::PhoneTaken);
        assert_eq!(snapshot.users.len(), 1);
    }

    #[test]
    fn register_requires_all_fields() {
        assert_eq!(
            register(Snapshot::default(), "", "111", "pw").unwrap_err(),
            AuthError::MissingFields
        );
        assert_eq!(
            register(Snapshot::default(), "Ana", "111", "").unwrap_err(),
            AuthError::MissingFields
        );
    }

    #[test]
    fn login_errors_do_not_reveal_which_field_was_wrong() {
        let snapshot = snapshot_with_ana();

        assert_eq!(login(&snapshot, "111", "pw").unwrap().name, "Ana");

        let wrong_password = login(&snapshot, "111", "nope").unwrap_err();
        let unknown_phone = login(&snapshot, "999", "pw").unwrap_err();
        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_phone.to_string());
    }
}
