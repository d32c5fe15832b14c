//! Application error types

use alumni_domain::DomainError;
use thiserror::Error;

/// Errors reported by an [`AuthTransport`](crate::ports::AuthTransport).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable detail from the response body, if any.
        details: Option<String>,
    },

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The server could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a success status but an unusable body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Server-provided detail message, if the server sent one.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Status {
                details: Some(details),
                ..
            } if !details.trim().is_empty() => Some(details),
            _ => None,
        }
    }
}

/// Errors reported by a [`KeyValueStorage`](crate::ports::KeyValueStorage).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend is disabled or cannot be located.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Why a session exchange failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The server refused the exchange (bad credentials, expired cookie).
    #[error("rejected by server ({status})")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail message.
        details: Option<String>,
    },

    /// The exchange did not complete (network, timeout, bad body).
    #[error("transport failure: {0}")]
    Transport(TransportError),

    /// The returned access credential could not be decoded.
    #[error("could not decode access token: {0}")]
    Decode(#[from] DomainError),
}

impl From<TransportError> for SessionError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Status { status, details } => Self::Rejected { status, details },
            other => Self::Transport(other),
        }
    }
}

impl SessionError {
    /// The message to show the user: the server's detail when present,
    /// otherwise the given fallback.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                details: Some(details),
                ..
            } if !details.trim().is_empty() => details.clone(),
            _ => fallback.to_string(),
        }
    }
}
