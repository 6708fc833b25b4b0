//! Error types for Codex storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity kind (user, deck, pack, ...).
        entity: &'static str,
        /// The missing id.
        id: String,
    },

    /// Wallet balance too low for a debit.
    #[error("insufficient {currency}: balance={balance}, required={required}")]
    InsufficientFunds {
        /// Which balance was short ("coins" or "diamonds").
        currency: &'static str,
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Card quantity too low for a removal.
    #[error("insufficient quantity: held={held}, requested={requested}")]
    InsufficientQuantity {
        /// Copies currently held.
        held: i64,
        /// Copies requested for removal.
        requested: i64,
    },

    /// Event rejected before application (malformed delta set).
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}
