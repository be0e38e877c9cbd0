//! Error types for lob-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid trading pair: {0}")]
    InvalidTradingPair(String),

    #[error("Invalid order side: {0}")]
    InvalidSide(String),

    #[error("Invalid price type: {0}")]
    InvalidPriceType(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
