//! Alumni Application - Session core and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for transport, storage, clock and UI events)
//! - The session store and controller
//! - Failure-isolated preference storage

pub mod error;
pub mod ports;
pub mod preference;
pub mod session;

pub use error::{SessionError, StorageError, TransportError};
pub use ports::{AuthTransport, Clock, KeyValueStorage, Navigator, Notifier, TokenResponse};
pub use preference::{PERSIST_KEY, PersistedPreference};
pub use session::{
    DEFAULT_SIGN_IN_PATH, LoginOutcome, MIN_REFRESH_DELAY, RefreshHandle, RefreshPolicy,
    SessionController, SessionSnapshot, SessionStore, spawn_refresh_task,
};
