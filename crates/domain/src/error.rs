//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The username is empty or whitespace.
    #[error("username is required")]
    EmptyUsername,

    /// The password is empty.
    #[error("password is required")]
    EmptyPassword,

    /// The access credential is not a well-formed token.
    #[error("malformed access token: {0}")]
    MalformedToken(String),

    /// The decoded payload is missing a required claim or has the wrong shape.
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// An endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The hostname used to pick an endpoint base is empty.
    #[error("invalid hostname: {0:?}")]
    InvalidHostname(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
