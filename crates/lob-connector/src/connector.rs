//! Connector trait consumed by the strategy.
//!
//! A connector is an execution venue (exchange or paper simulator). The
//! strategy holds it as `Arc<dyn Connector>` and never owns its lifecycle.
//! Order lifecycle events are pushed through an [`EventReceiver`] handed
//! out when the connector is built.

use lob_core::{LifecycleEvent, OrderId, OrderRequest, Price, PriceType, DEFAULT_PAIR_SEPARATOR};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::error::ConnectorResult;

pub type EventSender = mpsc::UnboundedSender<LifecycleEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<LifecycleEvent>;

/// Create the channel a connector uses to publish lifecycle events.
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Execution venue abstraction.
///
/// All calls are synchronous from the strategy's point of view. Timeouts
/// and retries are the connector's business.
pub trait Connector: Send + Sync {
    /// Connector name, used in notifications.
    fn name(&self) -> &str;

    /// Whether the connector can accept orders and answer queries.
    fn is_ready(&self) -> bool;

    /// Separator between base and quote in this connector's pair symbols.
    fn trading_pair_separator(&self) -> char {
        DEFAULT_PAIR_SEPARATOR
    }

    /// Total balance of `asset`.
    fn get_balance(&self, asset: &str) -> ConnectorResult<Decimal>;

    /// Balance of `asset` not reserved by open orders.
    fn get_available_balance(&self, asset: &str) -> ConnectorResult<Decimal>;

    /// Current price of `trading_pair` for the given price type.
    fn get_price(&self, trading_pair: &str, price_type: PriceType) -> ConnectorResult<Price>;

    /// Place an order and return the id the connector assigned to it.
    fn submit_order(&self, request: &OrderRequest) -> ConnectorResult<OrderId>;

    /// Request cancellation of an open order.
    fn cancel_order(&self, trading_pair: &str, order_id: &OrderId) -> ConnectorResult<()>;
}
