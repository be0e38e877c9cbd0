//! Single limit order strategy.
//!
//! - [`OrderGate`]: waits for connector readiness, then fires one order
//! - [`LifecycleReducer`]: applies connector lifecycle events to order records
//! - [`PriceOracle`] / [`PortfolioView`]: price and balance queries
//! - [`LimitOrderStrategy`]: the pieces above bound to one market
//! - [`Scheduler`]: tokio driver for ticks, events and status reports

pub mod config;
pub mod error;
pub mod gate;
pub mod market;
pub mod oracle;
pub mod portfolio;
pub mod reducer;
pub mod scheduler;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use config::StrategyConfig;
pub use error::{StrategyError, StrategyResult};
pub use gate::{GatePhase, GateState, OrderGate};
pub use market::MarketInfo;
pub use oracle::PriceOracle;
pub use portfolio::{
    value_shares, AssetBalance, PortfolioReport, PortfolioStatus, PortfolioView, NOT_READY_STATUS,
};
pub use reducer::{fill_message, LifecycleReducer};
pub use scheduler::Scheduler;
pub use strategy::LimitOrderStrategy;
