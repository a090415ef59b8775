//! Error types for backend API integration

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// Access code is malformed; caught before any network call
    #[error("Code format must be like T00010-8AB")]
    Format,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend signalled that the stored token is invalid or expired
    #[error("Session expired: {message}")]
    AuthExpired {
        /// Message from the backend
        message: String,
    },

    /// Requested resource does not exist
    #[error("{what} not found")]
    NotFound {
        /// What was being fetched
        what: String,
    },

    /// Backend returned an error response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },
}

impl ClientError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::Request(_) | ClientError::Api { .. })
    }

    /// Check if this error requires re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ClientError::AuthExpired { .. })
    }
}
