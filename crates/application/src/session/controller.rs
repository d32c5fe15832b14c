//! Session controller: login, refresh and logout.
//!
//! Every public operation resolves fully. Failures turn into a single error
//! notification and never reach the caller as an `Err`.

use std::sync::Arc;

use alumni_domain::{
    Credentials, Identity, LOGIN_FAILED_MESSAGE, LOGIN_SUCCESS_MESSAGE, Navigation, Notification,
    REFRESH_FAILED_MESSAGE, Session, SessionState,
};
use tokio::sync::Mutex;

use super::store::SessionStore;
use crate::error::SessionError;
use crate::ports::{AuthTransport, Clock, Navigator, Notifier};

/// Route of the sign-in entry point.
pub const DEFAULT_SIGN_IN_PATH: &str = "/signin";

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session was established.
    Authenticated(Identity),
    /// The attempt failed; the store is unchanged.
    Failed {
        /// What went wrong.
        error: SessionError,
        /// The message shown to the user.
        message: String,
    },
    /// The server accepted the credentials, but a newer operation (such as a
    /// logout) finished first, so the result was dropped.
    Superseded,
}

impl LoginOutcome {
    /// Returns true if the session was established.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Drives the session lifecycle.
///
/// The controller is the only writer of its [`SessionStore`]. Share it behind
/// an `Arc` with whatever needs to sign in or out.
pub struct SessionController {
    store: Arc<SessionStore>,
    transport: Arc<dyn AuthTransport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    sign_in_path: String,
    refresh_gate: Mutex<()>,
}

impl SessionController {
    /// Creates a controller over the given store and adapters.
    pub fn new(
        store: Arc<SessionStore>,
        transport: Arc<dyn AuthTransport>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            transport,
            notifier,
            navigator,
            clock,
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Sets the route logout redirects to.
    #[must_use]
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Read access to the session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The clock this controller stamps sessions with.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Logical controller state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    /// Updates the "stay signed in" preference.
    pub async fn set_persist(&self, persist: bool) {
        self.store.set_persist(persist).await;
    }

    /// Signs in with credentials and navigates to `redirect_target` on success.
    ///
    /// On success: one navigation (replacing the current route) and one
    /// success notification. On failure: the store is untouched and one error
    /// notification carries the server's detail message or a generic one.
    pub async fn login(&self, credentials: &Credentials, redirect_target: &str) -> LoginOutcome {
        let ticket = self.store.issue_ticket();
        tracing::debug!(ticket, username = credentials.username(), "login started");

        let result = match self.transport.login(credentials).await {
            Ok(response) => {
                Identity::from_access_token(response.access_token).map_err(SessionError::from)
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(identity) => {
                let session = Session::new(identity.clone(), self.clock.now(), ticket);
                if !self.store.replace(ticket, Some(session)) {
                    tracing::debug!(ticket, "login response superseded, discarding");
                    return LoginOutcome::Superseded;
                }

                tracing::info!(
                    user = identity.user(),
                    roles = ?identity.roles(),
                    token = %identity.token_preview(),
                    "logged in"
                );
                self.navigator.navigate(Navigation::replace(redirect_target));
                self.notifier
                    .notify(Notification::success(LOGIN_SUCCESS_MESSAGE));
                LoginOutcome::Authenticated(identity)
            }
            Err(error) => {
                tracing::warn!(ticket, %error, "login failed");
                let message = error.user_message(LOGIN_FAILED_MESSAGE);
                self.notifier.notify(Notification::error(message.clone()));
                LoginOutcome::Failed { error, message }
            }
        }
    }

    /// Renews the access credential from the durable refresh cookie.
    ///
    /// Does nothing and returns `None` unless the persist preference is on.
    /// Concurrent calls are serialised; a caller that waited while another
    /// refresh renewed the session gets that credential without a second
    /// network call. Failures leave the session as it was, notify once, and
    /// are not retried.
    pub async fn refresh(&self) -> Option<String> {
        if !self.store.persist() {
            return None;
        }

        let observed = self.store.generation();
        let _gate = self.refresh_gate.lock().await;

        let current = self.store.snapshot();
        if !current.persist {
            return None;
        }
        if current.generation != observed
            && let Some(session) = current.session
        {
            tracing::debug!("session renewed while waiting, reusing credential");
            return Some(session.identity.access_token().to_string());
        }

        let ticket = self.store.issue_ticket();
        tracing::debug!(ticket, "refresh started");

        let result = match self.transport.refresh().await {
            Ok(response) => {
                Identity::from_access_token(response.access_token).map_err(SessionError::from)
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(identity) => {
                let access_token = identity.access_token().to_string();
                let preview = identity.token_preview();
                let session = Session::new(identity, self.clock.now(), ticket);
                if !self.store.replace(ticket, Some(session)) {
                    tracing::debug!(ticket, "refresh response superseded, discarding");
                    return None;
                }

                tracing::info!(token = %preview, "access token refreshed");
                Some(access_token)
            }
            Err(error) => {
                tracing::warn!(ticket, %error, "token refresh failed");
                self.notifier
                    .notify(Notification::error(error.user_message(REFRESH_FAILED_MESSAGE)));
                None
            }
        }
    }

    /// Signs out.
    ///
    /// The server call is best effort. Whatever it returns, the session is
    /// cleared, the persisted preference is removed and the client is sent
    /// to the sign-in route.
    pub async fn logout(&self) {
        let access_token = self
            .store
            .session()
            .map(|s| s.identity.access_token().to_string());

        if let Err(e) = self.transport.logout(access_token.as_deref()).await {
            tracing::warn!(error = %e, "server-side logout failed, clearing local session anyway");
        }

        self.store.clear();
        self.store.forget_persist().await;
        tracing::info!("logged out");

        self.navigator
            .navigate(Navigation::reload(self.sign_in_path.clone()));
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.store.state())
            .field("sign_in_path", &self.sign_in_path)
            .finish_non_exhaustive()
    }
}
