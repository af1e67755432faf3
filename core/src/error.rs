//! Error types for the Roomping client.
//!
//! # Design
//! Two failure kinds matter to callers. `Api` means the server answered with
//! a status outside `[200, 300)`; it carries the status, the requested URL,
//! and whatever body came back. `Transport` means no response arrived at all
//! and wraps the `reqwest` error untouched. The remaining variants cover JSON
//! encoding of request bodies and decoding of successful responses into a
//! caller-chosen type.

use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The server responded with a non-success status.
#[derive(Debug, Clone, Error)]
#[error("{code} - {url} failed")]
pub struct ApiError {
    /// HTTP status code of the response.
    pub code: u16,
    /// Requested URL, without query string.
    pub url: String,
    /// Response body, parsed as JSON when possible.
    pub meta: Value,
}

/// Errors returned by `ApiClient`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response (DNS, connect, TLS, bad URL).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("request body serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("response body deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl Error {
    /// Status code when the server responded with a failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
