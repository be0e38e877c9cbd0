//! Strategy configuration.

use std::time::Duration;

use lob_core::{OrderSide, PriceType, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StrategyError, StrategyResult};

/// Settings of the single-order strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Trading pair in the connector's symbol format.
    #[serde(default = "default_trading_pair")]
    pub trading_pair: String,

    /// Order amount in base asset.
    #[serde(default = "default_order_amount")]
    pub order_amount: Decimal,

    #[serde(default)]
    pub side: OrderSide,

    /// Price the limit order is placed at.
    #[serde(default)]
    pub price_type: PriceType,

    /// Milliseconds between gate evaluations.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seconds between status reports. 0 disables them.
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
}

fn default_trading_pair() -> String {
    "BTC-USDT".to_string()
}

fn default_order_amount() -> Decimal {
    Decimal::new(5, 3)
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_status_interval_secs() -> u64 {
    30
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            trading_pair: default_trading_pair(),
            order_amount: default_order_amount(),
            side: OrderSide::default(),
            price_type: PriceType::default(),
            tick_interval_ms: default_tick_interval_ms(),
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

impl StrategyConfig {
    pub fn order_size(&self) -> Size {
        Size::new(self.order_amount)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// `None` when status reports are disabled.
    pub fn status_interval(&self) -> Option<Duration> {
        (self.status_interval_secs > 0).then(|| Duration::from_secs(self.status_interval_secs))
    }

    /// Reject settings the strategy cannot run with.
    pub fn validate(&self) -> StrategyResult<()> {
        if self.trading_pair.trim().is_empty() {
            return Err(StrategyError::InvalidConfig(
                "trading_pair must not be empty".to_string(),
            ));
        }
        if self.order_amount <= Decimal::ZERO {
            return Err(StrategyError::InvalidConfig(format!(
                "order_amount must be positive, got {}",
                self.order_amount
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(StrategyError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
