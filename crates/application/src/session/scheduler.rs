//! Opt-in proactive token refresh.
//!
//! Nothing refreshes on its own unless an embedder spawns this task. Once
//! running, it renews the access credential a fixed lead time before it
//! expires, re-arms whenever the session changes, and stops when the session
//! ends or its [`RefreshHandle`] is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::controller::SessionController;

/// Shortest wait between two scheduled refreshes.
pub const MIN_REFRESH_DELAY: Duration = Duration::from_secs(1);

/// Timing of the refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// How long before expiry to refresh.
    pub lead: Duration,
    /// Delay before retrying after a failed refresh.
    pub failure_backoff: Duration,
    /// Consecutive failures after which the session is signed out.
    pub max_consecutive_failures: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            lead: Duration::from_secs(60),
            failure_backoff: Duration::from_secs(30),
            max_consecutive_failures: 3,
        }
    }
}

/// Handle to a running refresh task. Dropping it stops the task.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the task.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Returns true once the task has stopped on its own.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the refresh task on the current tokio runtime.
#[must_use]
pub fn spawn_refresh_task(
    controller: Arc<SessionController>,
    policy: RefreshPolicy,
) -> RefreshHandle {
    RefreshHandle {
        task: tokio::spawn(run(controller, policy)),
    }
}

/// Wait before refreshing a credential that expires in `remaining` seconds.
///
/// Normally `lead` ahead of expiry. A credential that lives no longer than
/// `lead` waits half its remaining lifetime instead, and never less than
/// [`MIN_REFRESH_DELAY`].
fn refresh_delay(remaining: i64, lead: Duration) -> Duration {
    let lead = i64::try_from(lead.as_secs()).unwrap_or(i64::MAX);
    let secs = remaining.saturating_sub(lead).max(remaining / 2);
    Duration::from_secs(u64::try_from(secs).unwrap_or(0)).max(MIN_REFRESH_DELAY)
}

async fn run(controller: Arc<SessionController>, policy: RefreshPolicy) {
    let mut changes = controller.store().subscribe();
    let mut failures: u32 = 0;
    let mut seen_session = false;

    loop {
        let snapshot = changes.borrow_and_update().clone();

        let Some(session) = snapshot.session else {
            if seen_session {
                tracing::info!("session ended, stopping refresh schedule");
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
            continue;
        };
        seen_session = true;

        let delay = if failures > 0 {
            Some(policy.failure_backoff.max(MIN_REFRESH_DELAY))
        } else {
            session
                .seconds_until_expiry(controller.clock().now())
                .map(|remaining| refresh_delay(remaining, policy.lead))
        };

        // No expiry, or refresh not allowed: wait for the store to change.
        let Some(delay) = delay.filter(|_| snapshot.persist) else {
            if changes.changed().await.is_err() {
                return;
            }
            continue;
        };

        tracing::debug!(delay_secs = delay.as_secs(), "next token refresh scheduled");
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
                continue;
            }
        }

        if controller.refresh().await.is_some() {
            failures = 0;
            continue;
        }

        failures += 1;
        tracing::warn!(failures, "scheduled token refresh failed");
        if failures >= policy.max_consecutive_failures {
            tracing::warn!("too many refresh failures, signing out");
            controller.logout().await;
            return;
        }
    }
}
