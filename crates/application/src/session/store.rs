//! Session store with generation tracking.
//!
//! The store holds the current [`Session`] and the "stay signed in"
//! preference behind a `tokio::sync::watch` channel, so readers get a
//! consistent snapshot and can subscribe to changes.
//!
//! Writes are ordered by tickets. Every session exchange takes a ticket
//! before it goes to the network, and its result is applied only if the
//! ticket is newer than the generation already applied. A response that
//! resolves after a newer one (or after logout) is dropped instead of
//! overwriting fresher state.

use std::sync::atomic::{AtomicU64, Ordering};

use alumni_domain::{Session, SessionState};
use tokio::sync::watch;

use crate::preference::PersistedPreference;

/// A consistent view of the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// The current session, if any.
    pub session: Option<Session>,
    /// Ticket of the last applied write.
    pub generation: u64,
    /// Whether the user opted into staying signed in.
    pub persist: bool,
}

impl SessionSnapshot {
    /// Logical controller state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        SessionState::of(self.session.as_ref())
    }
}

/// Holder of the current session and persist preference.
///
/// Consumers can read and subscribe; only the session controller in this
/// crate can replace the session.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionSnapshot>,
    issued: AtomicU64,
    preference: PersistedPreference<bool>,
}

impl SessionStore {
    /// Opens a store, reading the persist preference once from durable storage.
    ///
    /// An unset or unreadable preference counts as `false`.
    pub async fn open(preference: PersistedPreference<bool>) -> Self {
        let persist = preference.read().await.unwrap_or(false);
        tracing::debug!(persist, "session store opened");

        Self {
            state: watch::Sender::new(SessionSnapshot {
                persist,
                ..SessionSnapshot::default()
            }),
            issued: AtomicU64::new(0),
            preference,
        }
    }

    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    /// A copy of the whole store state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Logical controller state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().state()
    }

    /// Ticket of the last applied write.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Whether the user opted into staying signed in.
    #[must_use]
    pub fn persist(&self) -> bool {
        self.state.borrow().persist
    }

    /// Updates the persist preference in memory, then durably.
    pub async fn set_persist(&self, persist: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.persist != persist;
            state.persist = persist;
            changed
        });
        self.preference.write(&persist).await;
    }

    /// Subscribes to store changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Takes a ticket for an operation that will write the session.
    pub(crate) fn issue_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces the session if `ticket` is newer than the applied generation.
    ///
    /// Returns whether the write was applied.
    pub(crate) fn replace(&self, ticket: u64, session: Option<Session>) -> bool {
        self.state.send_if_modified(|state| {
            if ticket <= state.generation {
                return false;
            }
            state.session = session;
            state.generation = ticket;
            true
        })
    }

    /// Clears the session, fencing off every operation already in flight.
    pub(crate) fn clear(&self) {
        let ticket = self.issue_ticket();
        self.replace(ticket, None);
    }

    /// Forgets the persist preference in memory and in durable storage.
    pub(crate) async fn forget_persist(&self) {
        self.state.send_if_modified(|state| {
            let changed = state.persist;
            state.persist = false;
            changed
        });
        self.preference.remove().await;
    }
}
