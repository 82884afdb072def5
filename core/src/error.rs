//! Error types for the blog API client.
//!
//! # Design
//! Every non-2xx response lands in `Http` with the raw status code and body;
//! 404 and 500 are not told apart. A body that is valid JSON but not the
//! expected record shape is `InvalidResponse` rather than being passed
//! through. Transport failures are carried as reqwest reports them.

use thiserror::Error;

/// Errors returned by `PostClient` parse methods and `PostApiClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a status outside the 2xx range.
    #[error("API error {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the expected record.
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The underlying HTTP transport failed (DNS, connection, TLS, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The per-request deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The request was cancelled by its caller.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
