//! Notification and navigation adapters.

use alumni_application::{Navigator, Notifier};
use alumni_domain::{Navigation, NavigationMode, Notification, NotificationLevel, SessionEvent};
use tokio::sync::mpsc;

/// Writes notifications and navigations to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl Notifier for TracingEventSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(message = %notification.message, "notification");
            }
            NotificationLevel::Error => {
                tracing::warn!(message = %notification.message, "notification");
            }
        }
    }
}

impl Navigator for TracingEventSink {
    fn navigate(&self, navigation: Navigation) {
        let mode = match navigation.mode {
            NavigationMode::Replace => "replace",
            NavigationMode::Reload => "reload",
        };
        tracing::info!(target_route = %navigation.target, mode, "navigate");
    }
}

/// Forwards notifications and navigations as [`SessionEvent`]s over a channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that consumes its events.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("session event receiver dropped, discarding event");
        }
    }
}

impl Notifier for ChannelEventSink {
    fn notify(&self, notification: Notification) {
        self.emit(SessionEvent::Notify(notification));
    }
}

impl Navigator for ChannelEventSink {
    fn navigate(&self, navigation: Navigation) {
        self.emit(SessionEvent::Navigate(navigation));
    }
}
