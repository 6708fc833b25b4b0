//! Error types for Codex core operations.

use crate::ids::IdError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur when constructing or validating domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Unknown card type discriminator.
    #[error("unknown card type: {0}")]
    UnknownCardType(String),

    /// Unknown rarity discriminator.
    #[error("unknown rarity: {0}")]
    UnknownRarity(String),

    /// Unknown role discriminator.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Quantity outside the permitted range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),
}
