//! Client configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `alumni-session.toml` in the working directory, or an explicit file
//! 3. `ALUMNI_*` environment variables (`ALUMNI_HOSTNAME`, `ALUMNI_STORAGE_DIR`, ...)
//!
//! ```toml
//! hostname = "alumni.example.edu"
//! default_redirect = "/dashboard"
//! refresh_lead_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use alumni_application::{DEFAULT_SIGN_IN_PATH, RefreshPolicy};
use alumni_domain::{ApiEndpoints, DomainError};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::persistence::FileKeyValueStorage;

/// Base name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "alumni-session";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ALUMNI";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// No storage directory was configured and the platform has none.
    #[error("no storage directory configured and no platform config directory available")]
    NoStorageDir,
}

impl From<DomainError> for ConfigError {
    fn from(error: DomainError) -> Self {
        Self::Invalid(error.to_string())
    }
}

/// Settings for the session client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Hostname the client is served from; selects the API base.
    pub hostname: String,
    /// Directory for `storage.json`. Defaults to the platform config directory.
    pub storage_dir: Option<PathBuf>,
    /// Where logout navigates.
    pub sign_in_path: String,
    /// Where login navigates when no target is given.
    pub default_redirect: String,
    /// How long before expiry the scheduler refreshes.
    pub refresh_lead_secs: u64,
    /// Delay before retrying a failed scheduled refresh.
    pub refresh_backoff_secs: u64,
    /// Consecutive scheduled refresh failures before signing out.
    pub max_refresh_failures: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let policy = RefreshPolicy::default();
        Self {
            hostname: "localhost".to_string(),
            storage_dir: None,
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            default_redirect: "/dashboard".to_string(),
            refresh_lead_secs: policy.lead.as_secs(),
            refresh_backoff_secs: policy.failure_backoff.as_secs(),
            max_refresh_failures: policy.max_consecutive_failures,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default file (if present) or `file`,
    /// then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, or if an explicit `file`
    /// does not exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let config = Config::builder()
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::Invalid("hostname must not be empty".to_string()));
        }
        for (name, path) in [
            ("sign_in_path", &self.sign_in_path),
            ("default_redirect", &self.default_redirect),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{name} must start with '/', got {path:?}"
                )));
            }
        }
        if self.refresh_lead_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_lead_secs must be at least 1".to_string(),
            ));
        }
        if self.refresh_backoff_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_backoff_secs must be at least 1".to_string(),
            ));
        }
        if self.max_refresh_failures == 0 {
            return Err(ConfigError::Invalid(
                "max_refresh_failures must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Endpoints for the configured hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is not a valid host.
    pub fn endpoints(&self) -> Result<ApiEndpoints, ConfigError> {
        Ok(ApiEndpoints::for_hostname(&self.hostname)?)
    }

    /// Scheduler policy built from the refresh settings.
    #[must_use]
    pub const fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            lead: Duration::from_secs(self.refresh_lead_secs),
            failure_backoff: Duration::from_secs(self.refresh_backoff_secs),
            max_consecutive_failures: self.max_refresh_failures,
        }
    }

    /// The configured storage directory, or the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoStorageDir`] if neither is available.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        self.storage_dir
            .clone()
            .or_else(FileKeyValueStorage::default_dir)
            .ok_or(ConfigError::NoStorageDir)
    }
}
