//! Session record and the logical session state machine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::Identity;

/// The client-side record of an authenticated session.
///
/// Sessions are replaced whole; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Who is authenticated.
    pub identity: Identity,
    /// When this session value was established (login or last refresh).
    pub established_at: DateTime<Utc>,
    /// Ticket of the operation that produced this session.
    pub generation: u64,
}

impl Session {
    /// Creates a session from a decoded identity.
    #[must_use]
    pub const fn new(identity: Identity, established_at: DateTime<Utc>, generation: u64) -> Self {
        Self {
            identity,
            established_at,
            generation,
        }
    }

    /// Seconds until the access credential expires, or None if it has no expiry.
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.identity
            .expires_at()
            .map(|exp| (exp - now).num_seconds())
    }
}

/// Logical state of the session controller.
///
/// There is no pending state: operations are request/response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No identity is held. Initial state, and the state after logout.
    #[default]
    Anonymous,
    /// An identity is held.
    Authenticated,
}

impl SessionState {
    /// Derives the state from an optional session.
    #[must_use]
    pub const fn of(session: Option<&Session>) -> Self {
        if session.is_some() {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }

    /// Get a user-friendly message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Anonymous => "Not signed in",
            Self::Authenticated => "Signed in",
        }
    }
}
