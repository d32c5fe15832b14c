//! Sign-in credentials.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// Username and password submitted to the login endpoint.
///
/// Serializes to the wire body `{"username": ..., "password": ...}`.
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Builds credentials, rejecting an empty username or password.
    ///
    /// The username is trimmed; the password is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyUsername`] or [`DomainError::EmptyPassword`].
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> DomainResult<Self> {
        let username = username.into().trim().to_string();
        let password = password.into();

        if username.is_empty() {
            return Err(DomainError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }

        Ok(Self { username, password })
    }

    /// The username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejects_empty_fields() {
        assert_eq!(
            Credentials::new("  ", "secret"),
            Err(DomainError::EmptyUsername)
        );
        assert_eq!(Credentials::new("alice", ""), Err(DomainError::EmptyPassword));
    }

    #[test]
    fn test_trims_username_only() {
        let creds = Credentials::new(" alice ", " pw ").unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), " pw ");
    }

    #[test]
    fn test_wire_shape() {
        let creds = Credentials::new("alice", "correct").unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"username": "alice", "password": "correct"})
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
