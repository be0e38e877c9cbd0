//! Limit order bot.
//!
//! Loads [`AppConfig`], wires a paper connector to the single limit order
//! strategy and runs it until shutdown.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, TelemetryConfig, DEFAULT_CONFIG_PATH};
pub use error::{AppError, AppResult};
