//! Authentication transport using reqwest.
//!
//! This adapter implements the `AuthTransport` port. The underlying client
//! keeps a cookie store, which is how the durable refresh cookie set by the
//! login endpoint travels to the refresh and logout endpoints.

use std::sync::Arc;
use std::time::Duration;

use alumni_application::{AuthTransport, TokenResponse, TransportError};
use alumni_domain::{ApiEndpoints, Credentials};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

/// Fixed timeout for every authentication request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Error body returned by the authentication endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "detail")]
    details: Option<String>,
}

/// HTTP transport for the authentication endpoints.
#[derive(Debug, Clone)]
pub struct ReqwestAuthTransport {
    client: Client,
    endpoints: ApiEndpoints,
}

impl ReqwestAuthTransport {
    /// Creates a transport with a cookie-keeping client.
    ///
    /// Default configuration:
    /// - Timeout: 10 seconds
    /// - Cookie store: enabled
    /// - User-Agent: "alumni-session/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(endpoints: ApiEndpoints) -> Result<Self, TransportError> {
        let client = Self::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self { client, endpoints })
    }

    /// Creates a transport whose cookies live in `jar`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_cookie_jar(endpoints: ApiEndpoints, jar: Arc<Jar>) -> Result<Self, TransportError> {
        let client = Self::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self { client, endpoints })
    }

    fn builder() -> ClientBuilder {
        Client::builder()
            .user_agent(concat!("alumni-session/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
    }

    /// Creates a transport over an existing client.
    ///
    /// The client should have a cookie store, or refresh will never see the
    /// cookie set at login.
    #[must_use]
    pub const fn with_client(client: Client, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// The underlying client, sharing this transport's cookies.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// The resolved endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    fn post(&self, url: &Url) -> RequestBuilder {
        self.client
            .post(url.clone())
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(builder: RequestBuilder) -> Result<Response, TransportError> {
        let response = builder.send().await.map_err(map_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let details = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.details);

        Err(TransportError::Status {
            status: status.as_u16(),
            details,
        })
    }

    async fn token(response: Response) -> Result<TokenResponse, TransportError> {
        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| {
                TransportError::InvalidResponse(format!("failed to parse token response: {e}"))
            })
    }
}

#[async_trait]
impl AuthTransport for ReqwestAuthTransport {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, TransportError> {
        let builder = self.post(self.endpoints.login()).json(credentials);
        let response = Self::send(builder).await?;
        Self::token(response).await
    }

    async fn refresh(&self) -> Result<TokenResponse, TransportError> {
        let response = Self::send(self.post(self.endpoints.refresh())).await?;
        Self::token(response).await
    }

    async fn logout(&self, access_token: Option<&str>) -> Result<(), TransportError> {
        let mut builder = self.post(self.endpoints.logout());
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        Self::send(builder).await.map(drop)
    }
}

/// Maps reqwest errors to `TransportError`.
pub(crate) fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        let timeout_ms = u64::try_from(REQUEST_TIMEOUT.as_millis()).unwrap_or(u64::MAX);
        return TransportError::Timeout { timeout_ms };
    }

    if error.is_connect() {
        let host = error
            .url()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| "unknown".to_string());
        return TransportError::Connection(format!("{host}: {error}"));
    }

    if error.is_decode() || error.is_body() {
        return TransportError::InvalidResponse(error.to_string());
    }

    TransportError::Connection(error.to_string())
}
