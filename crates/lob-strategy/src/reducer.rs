//! Order lifecycle reducer.
//!
//! Applies connector lifecycle events to the per-order records and turns
//! each event into a notification. Events are applied in arrival order and
//! are not deduplicated: a redelivered event is applied and notified again.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lob_core::{
    split_trading_pair, LifecycleEvent, LifecycleEventKind, OrderId, OrderRecord, OrderRequest,
    OrderSide, OrderState, Price, Size,
};
use lob_telemetry::{Metrics, Notification};
use tracing::{debug, info, warn};

pub struct LifecycleReducer {
    orders: HashMap<OrderId, OrderRecord>,
    pair_separator: char,
}

impl LifecycleReducer {
    /// `pair_separator` is used to find the base asset in fill events.
    pub fn new(pair_separator: char) -> Self {
        Self {
            orders: HashMap::new(),
            pair_separator,
        }
    }

    /// Bind a connector-assigned id to the request it was returned for.
    ///
    /// Returns false if the id is already known; the existing record is kept.
    pub fn register(&mut self, order_id: OrderId, request: &OrderRequest, now: DateTime<Utc>) -> bool {
        if let Some(existing) = self.orders.get(&order_id) {
            warn!(
                order_id = %order_id,
                state = %existing.state,
                "Duplicate order id from connector, keeping existing record"
            );
            return false;
        }
        debug!(
            order_id = %order_id,
            side = %request.side,
            amount = %request.amount,
            price = %request.price,
            "Order registered"
        );
        let record = OrderRecord::from_request(order_id.clone(), request, now);
        self.orders.insert(order_id, record);
        true
    }

    /// Apply one event and return the notification describing it.
    pub fn on_event(&mut self, event: &LifecycleEvent) -> Notification {
        let label = event.kind.label();
        Metrics::lifecycle_event(label);

        let order_id = &event.order_id;
        let now = event.timestamp;

        if !self.orders.contains_key(order_id) {
            if let LifecycleEventKind::Created {
                side,
                trading_pair,
                amount,
                price,
                ..
            } = &event.kind
            {
                warn!(
                    order_id = %order_id,
                    trading_pair = %trading_pair,
                    "Created event for unregistered order, tracking it"
                );
                let request = OrderRequest::limit(trading_pair.as_str(), *side, *amount, *price);
                self.orders.insert(
                    order_id.clone(),
                    OrderRecord::from_request(order_id.clone(), &request, now),
                );
            } else {
                warn!(
                    order_id = %order_id,
                    kind = label,
                    "Lifecycle event for unknown order"
                );
                Metrics::unknown_order_event(label);
                return self.describe(event);
            }
        }

        if let Some(record) = self.orders.get_mut(order_id) {
            let before = record.state;
            apply(record, &event.kind, now);
            if before.is_terminal() {
                debug!(
                    order_id = %order_id,
                    kind = label,
                    state = %before,
                    "Event on terminal order, state unchanged"
                );
            } else {
                info!(
                    order_id = %order_id,
                    kind = label,
                    from = %before,
                    to = %record.state,
                    filled = %record.filled_amount,
                    "Order lifecycle event"
                );
            }
        }

        self.describe(event)
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&OrderRecord> {
        self.orders.get(order_id)
    }

    /// Owned snapshot of every record.
    pub fn orders(&self) -> Vec<OrderRecord> {
        let mut orders: Vec<_> = self.orders.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of records not yet in a terminal state.
    pub fn active_count(&self) -> usize {
        self.orders.values().filter(|r| r.state.is_active()).count()
    }

    /// Notification text, built only from the event's own fields.
    fn describe(&self, event: &LifecycleEvent) -> Notification {
        let id = &event.order_id;
        let ts = event.timestamp;
        match &event.kind {
            LifecycleEventKind::Created { side, .. } => {
                Notification::info(ts, format!("The {side} order {id} has been created"))
            }
            LifecycleEventKind::Filled {
                trading_pair,
                side,
                price,
                amount,
            } => Notification::info(
                ts,
                fill_message(trading_pair, *side, *price, *amount, self.pair_separator),
            ),
            LifecycleEventKind::Cancelled => {
                Notification::info(ts, format!("The order {id} has been cancelled"))
            }
            LifecycleEventKind::Failed { reason } => match reason {
                Some(reason) => Notification::warning(ts, format!("The order {id} failed: {reason}")),
                None => Notification::warning(ts, format!("The order {id} failed")),
            },
            LifecycleEventKind::Completed { side } => {
                Notification::info(ts, format!("The {side} order {id} has been completed"))
            }
        }
    }
}

/// State change for one event. Terminal records are left untouched.
fn apply(record: &mut OrderRecord, kind: &LifecycleEventKind, now: DateTime<Utc>) {
    match kind {
        LifecycleEventKind::Created { .. } => {
            record.transition(OrderState::Created, now);
        }
        LifecycleEventKind::Filled { amount, .. } => {
            record.apply_fill(*amount, now);
        }
        LifecycleEventKind::Cancelled => {
            record.transition(OrderState::Cancelled, now);
        }
        LifecycleEventKind::Failed { .. } => {
            record.transition(OrderState::Failed, now);
        }
        LifecycleEventKind::Completed { .. } => {
            if record.state.is_terminal() {
                return;
            }
            if record.filled_amount < record.amount {
                record.filled_amount = record.amount;
            }
            record.transition(OrderState::Filled, now);
        }
    }
}

/// `({pair}) {SIDE} order (price: {price}) of {amount} {BASE} is filled.`
pub fn fill_message(
    trading_pair: &str,
    side: OrderSide,
    price: Price,
    amount: Size,
    separator: char,
) -> String {
    let base = split_trading_pair(trading_pair, separator)
        .map(|(base, _)| base)
        .unwrap_or(trading_pair);
    format!(
        "({trading_pair}) {} order (price: {price}) of {amount} {base} is filled.",
        side.trade_type()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> OrderRequest {
        OrderRequest::limit(
            "BTC-USDT",
            OrderSide::Buy,
            Size::new(dec!(0.005)),
            Price::new(dec!(30000)),
        )
    }

    fn registered(id: &str) -> LifecycleReducer {
        let mut reducer = LifecycleReducer::new('-');
        assert!(reducer.register(OrderId::from(id), &request(), Utc::now()));
        reducer
    }

    fn fill(id: &str, amount: rust_decimal::Decimal) -> LifecycleEvent {
        LifecycleEvent::filled(
            id,
            "BTC-USDT",
            OrderSide::Buy,
            Price::new(dec!(30010)),
            Size::new(amount),
        )
    }

    fn state(reducer: &LifecycleReducer, id: &str) -> OrderState {
        reducer.get(&OrderId::from(id)).unwrap().state
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut reducer = registered("o-1");
        let other = OrderRequest::limit(
            "BTC-USDT",
            OrderSide::Sell,
            Size::new(dec!(1)),
            Price::new(dec!(1)),
        );
        assert!(!reducer.register(OrderId::from("o-1"), &other, Utc::now()));
        assert_eq!(reducer.len(), 1);
        assert_eq!(reducer.get(&OrderId::from("o-1")).unwrap().side, OrderSide::Buy);
    }

    #[test]
    fn test_created_notification() {
        let mut reducer = registered("o-1");
        let n = reducer.on_event(&LifecycleEvent::created(
            "o-1",
            OrderSide::Buy,
            "BTC-USDT",
            Size::new(dec!(0.005)),
            Price::new(dec!(30000)),
        ));
        assert_eq!(n.message, "The buy order o-1 has been created");
        assert_eq!(state(&reducer, "o-1"), OrderState::Created);
    }

    #[test]
    fn test_fill_message_format() {
        let mut reducer = registered("o-1");
        let n = reducer.on_event(&fill("o-1", dec!(0.005)));
        assert_eq!(
            n.message,
            "(BTC-USDT) BUY order (price: 30010) of 0.005 BTC is filled."
        );
        assert!(n.message.contains("BTC"));
        assert!(n.message.contains("order (price: 30010)"));
        assert!(n.message.contains("is filled."));
        assert_eq!(state(&reducer, "o-1"), OrderState::Filled);
    }

    #[test]
    fn test_partial_fills_accumulate() {
        let mut reducer = registered("o-1");
        reducer.on_event(&fill("o-1", dec!(0.002)));
        assert_eq!(state(&reducer, "o-1"), OrderState::PartiallyFilled);

        reducer.on_event(&fill("o-1", dec!(0.003)));
        let record = reducer.get(&OrderId::from("o-1")).unwrap();
        assert_eq!(record.state, OrderState::Filled);
        assert_eq!(record.filled_amount, Size::new(dec!(0.005)));
    }

    #[test]
    fn test_duplicate_completed_notifies_twice() {
        let mut reducer = registered("o-1");
        let event = LifecycleEvent::completed("o-1", OrderSide::Buy);

        let first = reducer.on_event(&event);
        let second = reducer.on_event(&event);

        assert_eq!(first.message, "The buy order o-1 has been completed");
        assert_eq!(first.message, second.message);
        let record = reducer.get(&OrderId::from("o-1")).unwrap();
        assert_eq!(record.state, OrderState::Filled);
        assert_eq!(record.filled_amount, Size::new(dec!(0.005)));
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let mut reducer = registered("o-1");
        reducer.on_event(&LifecycleEvent::cancelled("o-1"));
        assert_eq!(state(&reducer, "o-1"), OrderState::Cancelled);

        let n = reducer.on_event(&fill("o-1", dec!(0.005)));
        assert!(n.message.contains("is filled."));
        reducer.on_event(&LifecycleEvent::completed("o-1", OrderSide::Buy));
        reducer.on_event(&LifecycleEvent::failed("o-1", None));

        let record = reducer.get(&OrderId::from("o-1")).unwrap();
        assert_eq!(record.state, OrderState::Cancelled);
        assert_eq!(record.filled_amount, Size::ZERO);
        assert_eq!(reducer.active_count(), 0);
    }

    #[test]
    fn test_failed_with_and_without_reason() {
        let mut reducer = registered("o-1");
        let n = reducer.on_event(&LifecycleEvent::failed(
            "o-1",
            Some("insufficient USDT balance".to_string()),
        ));
        assert_eq!(n.message, "The order o-1 failed: insufficient USDT balance");
        assert_eq!(state(&reducer, "o-1"), OrderState::Failed);

        let n = reducer.on_event(&LifecycleEvent::failed("o-2", None));
        assert_eq!(n.message, "The order o-2 failed");
    }

    #[test]
    fn test_unknown_cancel_is_reported_not_inserted() {
        let mut reducer = LifecycleReducer::new('-');
        let n = reducer.on_event(&LifecycleEvent::cancelled("X123"));
        assert!(n.message.contains("X123"));
        assert!(reducer.get(&OrderId::from("X123")).is_none());
        assert!(reducer.is_empty());
    }

    #[test]
    fn test_unknown_created_is_tracked() {
        let mut reducer = LifecycleReducer::new('-');
        reducer.on_event(&LifecycleEvent::created(
            "ext-1",
            OrderSide::Sell,
            "BTC-USDT",
            Size::new(dec!(0.01)),
            Price::new(dec!(30100)),
        ));
        let record = reducer.get(&OrderId::from("ext-1")).unwrap();
        assert_eq!(record.state, OrderState::Created);
        assert_eq!(record.side, OrderSide::Sell);
        assert_eq!(reducer.active_count(), 1);
    }

    #[test]
    fn test_fill_message_uses_separator() {
        assert_eq!(
            fill_message(
                "ETH_USDC",
                OrderSide::Sell,
                Price::new(dec!(2000.50)),
                Size::new(dec!(1.5)),
                '_'
            ),
            "(ETH_USDC) SELL order (price: 2000.5) of 1.5 ETH is filled."
        );
    }
}
