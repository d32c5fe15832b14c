//! Notification and navigation ports.

use alumni_domain::{Navigation, Notification};

/// Port for showing transient messages to the user.
pub trait Notifier: Send + Sync {
    /// Shows a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Port for moving the client to another route.
pub trait Navigator: Send + Sync {
    /// Navigates. Must not block.
    fn navigate(&self, navigation: Navigation);
}
