//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid session token.
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden - valid session but the caller is not an admin.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid or incomplete payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// League pack already claimed (ledger idempotency).
    #[error("pack for league '{0}' already claimed")]
    AlreadyClaimed(String),

    /// Wallet balance too low.
    #[error("insufficient {currency}: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Which balance was short.
        currency: &'static str,
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Card quantity too low.
    #[error("insufficient quantity: held={held}, requested={requested}")]
    InsufficientQuantity {
        /// Copies currently held.
        held: i64,
        /// Copies requested.
        requested: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error (identity provider).
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error envelope body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyClaimed(_) | Self::InsufficientQuantity { .. } => StatusCode::CONFLICT,
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<codex_store::StoreError> for ApiError {
    fn from(err: codex_store::StoreError) -> Self {
        match err {
            codex_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            codex_store::StoreError::InsufficientFunds {
                currency,
                balance,
                required,
            } => Self::InsufficientFunds {
                currency,
                balance,
                required,
            },
            codex_store::StoreError::InsufficientQuantity { held, requested } => {
                Self::InsufficientQuantity { held, requested }
            }
            codex_store::StoreError::InvalidEvent(msg) => Self::BadRequest(msg),
            codex_store::StoreError::Database(msg)
            | codex_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<codex_core::CoreError> for ApiError {
    fn from(err: codex_core::CoreError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
