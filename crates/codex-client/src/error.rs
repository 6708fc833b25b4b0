//! Client error types.

/// Errors that can occur when using the codex client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session token was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Wallet balance too low.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Conflicting state (already claimed, insufficient quantity).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Server returned another error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// Error message from the envelope.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
