//! Authentication endpoint selection.
//!
//! The endpoint base is picked once, at start-up, from the client's hostname:
//! loopback hostnames talk to the local development server, everything else
//! talks to production.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Base URL of the local development server.
pub const LOCAL_API_BASE: &str = "http://127.0.0.1:8000/local_server_url";

/// Base URL of the production server.
pub const PRODUCTION_API_BASE: &str = "https://production_server_location_url";

/// Path of the login endpoint, relative to the base.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Path of the refresh endpoint, relative to the base.
pub const REFRESH_PATH: &str = "/auth/refresh/";

/// Path of the logout endpoint, relative to the base.
pub const LOGOUT_PATH: &str = "/auth/logout/";

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Local development server.
    Local,
    /// Fixed production server.
    Production,
}

impl Deployment {
    /// Resolves the deployment from the client's hostname.
    ///
    /// `localhost`, `127.0.0.1` and `::1` (bracketed or not) are loopback.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHostname`] if the hostname is empty.
    pub fn from_hostname(hostname: &str) -> DomainResult<Self> {
        let host = hostname.trim().trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(DomainError::InvalidHostname(hostname.to_string()));
        }

        if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1" {
            Ok(Self::Local)
        } else {
            Ok(Self::Production)
        }
    }

    /// The endpoint base for this deployment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Local => LOCAL_API_BASE,
            Self::Production => PRODUCTION_API_BASE,
        }
    }
}

/// Fully resolved authentication endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: Url,
    login: Url,
    refresh: Url,
    logout: Url,
}

impl ApiEndpoints {
    /// Resolves the endpoints for a hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is empty.
    pub fn for_hostname(hostname: &str) -> DomainResult<Self> {
        Self::with_base(Deployment::from_hostname(hostname)?.base_url())
    }

    /// Builds endpoints under an explicit base URL.
    ///
    /// Endpoint paths are appended to the base verbatim, so a base with a path
    /// component keeps it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the base is not an absolute URL.
    pub fn with_base(base: &str) -> DomainResult<Self> {
        let trimmed = base.trim_end_matches('/');
        let parse = |path: &str| {
            let joined = format!("{trimmed}{path}");
            Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))
        };

        Ok(Self {
            base: parse("")?,
            login: parse(LOGIN_PATH)?,
            refresh: parse(REFRESH_PATH)?,
            logout: parse(LOGOUT_PATH)?,
        })
    }

    /// The endpoint base.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves an arbitrary API path under the base.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the result is not a valid URL.
    pub fn resolve(&self, path: &str) -> DomainResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// `POST` target for login.
    #[must_use]
    pub const fn login(&self) -> &Url {
        &self.login
    }

    /// `POST` target for refresh.
    #[must_use]
    pub const fn refresh(&self) -> &Url {
        &self.refresh
    }

    /// `POST` target for logout.
    #[must_use]
    pub const fn logout(&self) -> &Url {
        &self.logout
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loopback_hostnames_are_local() {
        for host in ["localhost", "LOCALHOST", "127.0.0.1", "::1", "[::1]"] {
            assert_eq!(Deployment::from_hostname(host).unwrap(), Deployment::Local);
        }
    }

    #[test]
    fn test_other_hostnames_are_production() {
        for host in ["alumni.example.org", "192.168.1.10", "localhost.evil.com"] {
            assert_eq!(
                Deployment::from_hostname(host).unwrap(),
                Deployment::Production
            );
        }
    }

    #[test]
    fn test_empty_hostname_is_rejected() {
        assert!(matches!(
            Deployment::from_hostname(" "),
            Err(DomainError::InvalidHostname(_))
        ));
    }

    #[test]
    fn test_local_endpoints_keep_base_path() {
        let endpoints = ApiEndpoints::for_hostname("localhost").unwrap();
        assert_eq!(
            endpoints.login().as_str(),
            "http://127.0.0.1:8000/local_server_url/auth/login/"
        );
        assert_eq!(
            endpoints.refresh().as_str(),
            "http://127.0.0.1:8000/local_server_url/auth/refresh/"
        );
        assert_eq!(
            endpoints.logout().as_str(),
            "http://127.0.0.1:8000/local_server_url/auth/logout/"
        );
    }

    #[test]
    fn test_resolve_joins_paths() {
        let endpoints = ApiEndpoints::with_base("http://127.0.0.1:9000/").unwrap();
        assert_eq!(
            endpoints.resolve("/events/").unwrap().as_str(),
            "http://127.0.0.1:9000/events/"
        );
    }

    #[test]
    fn test_relative_base_is_rejected() {
        assert!(matches!(
            ApiEndpoints::with_base("not a url"),
            Err(DomainError::InvalidUrl(_))
        ));
    }
}
