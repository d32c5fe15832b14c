//! User-facing notifications and navigation requests emitted by session operations.

use serde::{Deserialize, Serialize};

/// Message shown after a successful login.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Successfully Logged In.";

/// Fallback message when login fails without a server-provided detail.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";

/// Fallback message when refresh fails without a server-provided detail.
pub const REFRESH_FAILED_MESSAGE: &str = "Token refresh failed.";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Returns true if this is an error notification.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NotificationLevel::Error)
    }
}

/// How a navigation should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Replace the current history entry (in-app navigation after login).
    Replace,
    /// Full reload at the target, dropping all in-memory state (after logout).
    Reload,
}

/// A request to move the client to another route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Route to go to.
    pub target: String,
    /// How to get there.
    pub mode: NavigationMode,
}

impl Navigation {
    /// In-app navigation that replaces the current entry.
    #[must_use]
    pub fn replace(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            mode: NavigationMode::Replace,
        }
    }

    /// Hard redirect.
    #[must_use]
    pub fn reload(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            mode: NavigationMode::Reload,
        }
    }
}

/// Events emitted by session operations, for embedders that consume a single stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Show a notification.
    Notify(Notification),
    /// Navigate somewhere.
    Navigate(Navigation),
}
