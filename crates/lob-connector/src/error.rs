//! Connector error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Connector {0} is not ready")]
    NotReady(String),

    #[error("Unknown trading pair: {0}")]
    UnknownTradingPair(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error(transparent)]
    Core(#[from] lob_core::CoreError),
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;
