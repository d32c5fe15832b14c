//! Session lifecycle.
//!
//! This module provides:
//! - The session store, with ticket-ordered writes and a persisted "stay signed in" flag
//! - The session controller (login, refresh, logout)
//! - An opt-in task that refreshes the access credential before it expires

mod controller;
mod scheduler;
mod store;

pub use controller::{DEFAULT_SIGN_IN_PATH, LoginOutcome, SessionController};
pub use scheduler::{MIN_REFRESH_DELAY, RefreshHandle, RefreshPolicy, spawn_refresh_task};
pub use store::{SessionSnapshot, SessionStore};
