//! Authentication transport port.

use alumni_domain::Credentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Success body of the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access credential.
    pub access_token: String,
}

/// Port for the authentication endpoints.
///
/// Implementations carry the durable refresh cookie between calls; the
/// session core never sees it.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Exchanges credentials for an access credential.
    ///
    /// # Errors
    /// Returns an error if the server rejects the credentials or cannot be reached.
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, TransportError>;

    /// Exchanges the refresh cookie for a new access credential.
    ///
    /// # Errors
    /// Returns an error if the server rejects the cookie or cannot be reached.
    async fn refresh(&self) -> Result<TokenResponse, TransportError>;

    /// Asks the server to invalidate its side of the session.
    ///
    /// `access_token` is attached as a bearer credential when present.
    ///
    /// # Errors
    /// Returns an error if the call fails; the response body is not consumed.
    async fn logout(&self, access_token: Option<&str>) -> Result<(), TransportError>;
}
