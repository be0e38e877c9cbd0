//! Core domain types for the limit-order strategy.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `TradingPair`: base/quote market identifier
//! - `OrderSide`, `OrderType`, `PriceType`, `OrderId`: Trading enums and ids
//! - `OrderRecord`, `OrderState`: Order lifecycle tracking
//! - `LifecycleEvent`: Connector-emitted order events

pub mod decimal;
pub mod error;
pub mod event;
pub mod execution;
pub mod market;
pub mod order;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use event::{LifecycleEvent, LifecycleEventKind};
pub use execution::{OrderRecord, OrderRequest, OrderState};
pub use market::{split_trading_pair, TradingPair, DEFAULT_PAIR_SEPARATOR};
pub use order::{OrderId, OrderSide, OrderType, PriceType};
