//! Alumni Domain - Core session types
//!
//! This crate defines the domain model for the alumni session client.
//! All types here are pure Rust with no I/O dependencies.

pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod identity;
pub mod session;

pub use credentials::Credentials;
pub use endpoint::{ApiEndpoints, Deployment};
pub use error::{DomainError, DomainResult};
pub use event::{
    LOGIN_FAILED_MESSAGE, LOGIN_SUCCESS_MESSAGE, Navigation, NavigationMode, Notification,
    NotificationLevel, REFRESH_FAILED_MESSAGE, SessionEvent,
};
pub use identity::{AccessClaims, Identity, token_preview};
pub use session::{Session, SessionState};
