//! Strategy error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Connector error: {0}")]
    Connector(#[from] lob_connector::ConnectorError),

    #[error("Core error: {0}")]
    Core(#[from] lob_core::CoreError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
