//! Error types for the transport.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur when sending through Mandrill.
///
/// Per-recipient rejections are not errors; they come back as data in
/// [`crate::SentMessage::rejected`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error reported by the Mandrill API itself (invalid key, bad
    /// payload, etc.).
    #[error("Mandrill API error {name} (code {code}): {message}")]
    Api {
        code: i64,
        name: String,
        message: String,
    },

    /// HTTP-level failure talking to the API.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request or response serialization failure.
    #[error("Serialization error: {0}")]
    Json(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Json(err.to_string())
    }
}
