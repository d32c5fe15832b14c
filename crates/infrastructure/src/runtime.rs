//! Wiring of the production adapters.

use std::sync::Arc;

use alumni_application::{
    KeyValueStorage, Navigator, Notifier, PERSIST_KEY, PersistedPreference, RefreshHandle,
    SessionController, SessionStore, TransportError, spawn_refresh_task,
};
use thiserror::Error;

use crate::adapters::{PersistentCookieJar, ReqwestAuthTransport, SystemClock};
use crate::config::{ClientConfig, ConfigError};
use crate::http::AuthorizedClient;
use crate::persistence::FileKeyValueStorage;

/// Errors that prevent the session runtime from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// A session controller with its production adapters.
#[derive(Debug)]
pub struct SessionRuntime {
    config: ClientConfig,
    controller: Arc<SessionController>,
    transport: ReqwestAuthTransport,
    cookies: PersistentCookieJar,
}

impl SessionRuntime {
    /// Starts a runtime backed by `storage.json` in the configured directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no storage directory is available or the HTTP
    /// client cannot be built.
    pub async fn open(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, StartupError> {
        let storage: Arc<dyn KeyValueStorage> =
            Arc::new(FileKeyValueStorage::new(config.storage_dir()?));
        Self::with_storage(config, storage, notifier, navigator).await
    }

    /// Starts a runtime over the given storage.
    ///
    /// Saved cookies are restored and the persist preference is read once.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is invalid or the HTTP client cannot be built.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, StartupError> {
        config.validate()?;
        let endpoints = config.endpoints()?;
        tracing::info!(base = %endpoints.base(), "resolved API endpoints");

        let cookies = PersistentCookieJar::new(Arc::clone(&storage), endpoints.clone());
        cookies.restore().await;
        let transport = ReqwestAuthTransport::with_cookie_jar(endpoints, cookies.jar())?;

        let preference = PersistedPreference::new(storage, PERSIST_KEY);
        let store = Arc::new(SessionStore::open(preference).await);
        let controller = SessionController::new(
            store,
            Arc::new(transport.clone()),
            notifier,
            navigator,
            Arc::new(SystemClock::new()),
        )
        .with_sign_in_path(config.sign_in_path.clone());

        Ok(Self {
            config,
            controller: Arc::new(controller),
            transport,
            cookies,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session controller.
    #[must_use]
    pub fn controller(&self) -> Arc<SessionController> {
        Arc::clone(&self.controller)
    }

    /// A client for authorized API calls sharing this runtime's cookies.
    #[must_use]
    pub fn authorized_client(&self) -> AuthorizedClient {
        AuthorizedClient::new(&self.transport, self.controller())
    }

    /// Starts proactive refresh with the configured policy.
    #[must_use]
    pub fn spawn_refresh(&self) -> RefreshHandle {
        spawn_refresh_task(self.controller(), self.config.refresh_policy())
    }

    /// Saves cookies while the persist preference is on, otherwise drops them.
    pub async fn checkpoint(&self) {
        if self.controller.store().persist() {
            self.cookies.save().await;
        } else {
            self.cookies.forget().await;
        }
    }
}
