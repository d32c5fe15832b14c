//! Authorized API requests.
//!
//! [`AuthorizedClient`] attaches the current access credential to requests
//! against the API base. When the server answers `401` or `403` it asks the
//! session controller for a refresh once and, if that yields a new
//! credential, replays the request with it.

use std::sync::Arc;

use alumni_application::{SessionController, TransportError};
use alumni_domain::{ApiEndpoints, DomainError};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::adapters::{REQUEST_ID_HEADER, ReqwestAuthTransport, map_error};

/// Errors from an authorized request.
#[derive(Debug, Error)]
pub enum AuthorizedRequestError {
    /// The path could not be resolved under the API base.
    #[error(transparent)]
    Url(#[from] DomainError),

    /// The body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Body(#[from] serde_json::Error),

    /// The request did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client for API calls that need the session's access credential.
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    client: Client,
    endpoints: ApiEndpoints,
    controller: Arc<SessionController>,
}

impl AuthorizedClient {
    /// Creates a client sharing the transport's connection pool and cookies.
    #[must_use]
    pub fn new(transport: &ReqwestAuthTransport, controller: Arc<SessionController>) -> Self {
        Self {
            client: transport.client().clone(),
            endpoints: transport.endpoints().clone(),
            controller,
        }
    }

    /// Sends a request to `path` under the API base.
    ///
    /// Non-success statuses other than the single refresh-and-replay are
    /// returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or body is invalid or the request fails to complete.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, AuthorizedRequestError> {
        let url = self.endpoints.resolve(path)?;
        let body = body.map(serde_json::to_vec).transpose()?;

        let token = self
            .controller
            .store()
            .session()
            .map(|s| s.identity.access_token().to_string());

        let response = self
            .dispatch(method.clone(), url.clone(), body.clone(), token.as_deref())
            .await?;

        if !matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(response);
        }

        tracing::debug!(status = %response.status(), %url, "access denied, attempting refresh");
        match self.controller.refresh().await {
            Some(renewed) => Ok(self.dispatch(method, url, body, Some(&renewed)).await?),
            None => Ok(response),
        }
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// See [`AuthorizedClient::send`].
    pub async fn get(&self, path: &str) -> Result<Response, AuthorizedRequestError> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// `POST` a JSON body to a path.
    ///
    /// # Errors
    ///
    /// See [`AuthorizedClient::send`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, AuthorizedRequestError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: url::Url,
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, uuid::Uuid::now_v7().to_string());

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        builder.send().await.map_err(map_error)
    }
}
