//! Application configuration.
//!
//! Sources, later ones override earlier ones:
//! 1. Built-in defaults
//! 2. TOML file (optional; a missing file is not an error)
//! 3. Environment variables prefixed with `LOB_`, nested with `__`
//!    (e.g. `LOB_STRATEGY__ORDER_AMOUNT=0.01`)

use std::path::Path;

use config::{Config, Environment, File};
use lob_connector::PaperConfig;
use lob_strategy::StrategyConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LOB";

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Paper connector the strategy trades on.
    #[serde(default)]
    pub paper: PaperConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from `path` plus environment overrides.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: impl AsRef<Path>, env: Environment) -> AppResult<Self> {
        let path = path.as_ref();
        let config: Self = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                env.separator("__")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the application cannot start with.
    pub fn validate(&self) -> AppResult<()> {
        self.strategy
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.paper.name.trim().is_empty() {
            return Err(AppError::Config("paper.name must not be empty".to_string()));
        }
        Ok(())
    }
}
