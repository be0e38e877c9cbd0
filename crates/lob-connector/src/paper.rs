//! In-memory paper-trading connector.
//!
//! Keeps balances, per-pair top-of-book quotes and open limit orders in
//! memory. Orders that cross the book fill immediately at their limit
//! price; resting orders fill when a later [`PaperConnector::set_quote`]
//! crosses them. Every state change is published as a [`LifecycleEvent`].

use std::collections::HashMap;

use lob_core::{
    LifecycleEvent, OrderId, OrderRequest, OrderSide, OrderType, Price, PriceType, Size,
    TradingPair, DEFAULT_PAIR_SEPARATOR,
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::connector::{create_event_channel, Connector, EventReceiver, EventSender};
use crate::error::{ConnectorError, ConnectorResult};

/// Top-of-book quote for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperQuote {
    pub trading_pair: String,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// Paper connector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    /// Connector name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Initial balances by asset.
    #[serde(default = "default_balances")]
    pub balances: HashMap<String, Decimal>,
    /// Initial quotes.
    #[serde(default = "default_quotes")]
    pub quotes: Vec<PaperQuote>,
    /// Number of readiness polls answered `false` before becoming ready.
    #[serde(default)]
    pub ready_after_polls: u32,
}

fn default_name() -> String {
    "paper_trade".to_string()
}

fn default_balances() -> HashMap<String, Decimal> {
    HashMap::from([
        ("BTC".to_string(), Decimal::ONE),
        ("USDT".to_string(), Decimal::from(10_000)),
    ])
}

fn default_quotes() -> Vec<PaperQuote> {
    vec![PaperQuote {
        trading_pair: "BTC-USDT".to_string(),
        bid: Decimal::from(29_990),
        ask: Decimal::from(30_010),
    }]
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            balances: default_balances(),
            quotes: default_quotes(),
            ready_after_polls: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenOrder {
    pair: TradingPair,
    side: OrderSide,
    amount: Size,
    price: Price,
}

impl OpenOrder {
    /// Asset and amount locked while the order rests.
    fn reservation(&self) -> (&str, Decimal) {
        match self.side {
            OrderSide::Buy => (self.pair.quote(), self.amount.notional(self.price)),
            OrderSide::Sell => (self.pair.base(), self.amount.inner()),
        }
    }

    fn crosses(&self, bid: Price, ask: Price) -> bool {
        match self.side {
            OrderSide::Buy => self.price >= ask,
            OrderSide::Sell => self.price <= bid,
        }
    }
}

#[derive(Debug, Default)]
struct PaperState {
    ready: bool,
    polls: u32,
    balances: HashMap<String, Decimal>,
    reserved: HashMap<String, Decimal>,
    quotes: HashMap<String, (Price, Price)>,
    open_orders: HashMap<OrderId, OpenOrder>,
}

impl PaperState {
    fn balance(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    fn available(&self, asset: &str) -> Decimal {
        self.balance(asset) - self.reserved.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    fn reserve(&mut self, asset: &str, amount: Decimal) {
        *self.reserved.entry(asset.to_string()).or_default() += amount;
    }

    fn release(&mut self, asset: &str, amount: Decimal) {
        if let Some(r) = self.reserved.get_mut(asset) {
            *r = (*r - amount).max(Decimal::ZERO);
        }
    }

    fn settle(&mut self, order: &OpenOrder) {
        let (reserved_asset, reserved_amount) = order.reservation();
        let reserved_asset = reserved_asset.to_string();
        self.release(&reserved_asset, reserved_amount);

        let notional = order.amount.notional(order.price);
        let (base, quote) = (order.pair.base(), order.pair.quote());
        let (base_delta, quote_delta) = match order.side {
            OrderSide::Buy => (order.amount.inner(), -notional),
            OrderSide::Sell => (-order.amount.inner(), notional),
        };
        *self.balances.entry(base.to_string()).or_default() += base_delta;
        *self.balances.entry(quote.to_string()).or_default() += quote_delta;
    }
}

/// In-memory connector for paper trading and tests.
#[derive(Debug)]
pub struct PaperConnector {
    name: String,
    ready_after_polls: u32,
    state: Mutex<PaperState>,
    events: EventSender,
}

impl PaperConnector {
    /// Create a paper connector and the receiver for its lifecycle events.
    pub fn new(config: PaperConfig) -> (Self, EventReceiver) {
        let (events, rx) = create_event_channel();
        let quotes = config
            .quotes
            .iter()
            .map(|q| {
                (
                    q.trading_pair.clone(),
                    (Price::new(q.bid), Price::new(q.ask)),
                )
            })
            .collect();
        let state = PaperState {
            ready: config.ready_after_polls == 0,
            // Layered config sources may lowercase map keys.
            balances: config
                .balances
                .into_iter()
                .map(|(asset, amount)| (asset.to_ascii_uppercase(), amount))
                .collect(),
            quotes,
            ..Default::default()
        };
        let connector = Self {
            name: config.name,
            ready_after_polls: config.ready_after_polls,
            state: Mutex::new(state),
            events,
        };
        (connector, rx)
    }

    /// Force readiness on or off.
    pub fn set_ready(&self, ready: bool) {
        let mut state = self.state.lock();
        state.ready = ready;
        state.polls = 0;
    }

    /// Overwrite the total balance of `asset`.
    pub fn set_balance(&self, asset: &str, amount: Decimal) {
        self.state.lock().balances.insert(asset.to_string(), amount);
    }

    /// Update the quote for a pair and fill any open orders it crosses.
    pub fn set_quote(&self, trading_pair: &str, bid: Decimal, ask: Decimal) {
        let mut state = self.state.lock();
        let (bid, ask) = (Price::new(bid), Price::new(ask));
        state.quotes.insert(trading_pair.to_string(), (bid, ask));

        let crossed: Vec<OrderId> = state
            .open_orders
            .iter()
            .filter(|(_, o)| o.pair.symbol() == trading_pair && o.crosses(bid, ask))
            .map(|(id, _)| id.clone())
            .collect();

        for order_id in crossed {
            if let Some(order) = state.open_orders.remove(&order_id) {
                self.fill(&mut state, order_id, order);
            }
        }
    }

    /// Number of resting orders.
    pub fn open_order_count(&self) -> usize {
        self.state.lock().open_orders.len()
    }

    fn emit(&self, event: LifecycleEvent) {
        debug!(
            connector = %self.name,
            order_id = %event.order_id,
            kind = event.kind.label(),
            "Emitting lifecycle event"
        );
        if self.events.send(event).is_err() {
            warn!(connector = %self.name, "Lifecycle event receiver dropped");
        }
    }

    fn fill(&self, state: &mut PaperState, order_id: OrderId, order: OpenOrder) {
        state.settle(&order);
        info!(
            connector = %self.name,
            order_id = %order_id,
            side = %order.side,
            price = %order.price,
            amount = %order.amount,
            "Paper order filled"
        );
        self.emit(LifecycleEvent::filled(
            order_id.clone(),
            order.pair.symbol(),
            order.side,
            order.price,
            order.amount,
        ));
        self.emit(LifecycleEvent::completed(order_id, order.side));
    }

    fn next_order_id(side: OrderSide, pair: &TradingPair) -> OrderId {
        let uuid_short = &Uuid::new_v4().simple().to_string()[..8];
        OrderId::new(format!("{side}-{pair}-{uuid_short}"))
    }
}

impl Connector for PaperConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        let mut state = self.state.lock();
        if !state.ready && self.ready_after_polls > 0 {
            state.polls += 1;
            if state.polls > self.ready_after_polls {
                state.ready = true;
            }
        }
        state.ready
    }

    fn get_balance(&self, asset: &str) -> ConnectorResult<Decimal> {
        Ok(self.state.lock().balance(asset))
    }

    fn get_available_balance(&self, asset: &str) -> ConnectorResult<Decimal> {
        Ok(self.state.lock().available(asset))
    }

    fn get_price(&self, trading_pair: &str, price_type: PriceType) -> ConnectorResult<Price> {
        let state = self.state.lock();
        let (bid, ask) = state
            .quotes
            .get(trading_pair)
            .copied()
            .ok_or_else(|| ConnectorError::UnknownTradingPair(trading_pair.to_string()))?;
        Ok(match price_type {
            PriceType::Mid => Price::midpoint(bid, ask),
            PriceType::Bid => bid,
            PriceType::Ask => ask,
        })
    }

    fn submit_order(&self, request: &OrderRequest) -> ConnectorResult<OrderId> {
        let pair = TradingPair::parse(&request.trading_pair, DEFAULT_PAIR_SEPARATOR)?;
        if request.order_type != OrderType::Limit {
            return Err(ConnectorError::InvalidOrder(format!(
                "{} orders are not supported",
                request.order_type
            )));
        }
        if !request.amount.is_positive() || !request.price.is_positive() {
            return Err(ConnectorError::InvalidOrder(format!(
                "amount {} and price {} must be positive",
                request.amount, request.price
            )));
        }

        let mut state = self.state.lock();
        if !state.ready {
            return Err(ConnectorError::NotReady(self.name.clone()));
        }
        let (bid, ask) = state
            .quotes
            .get(pair.symbol())
            .copied()
            .ok_or_else(|| ConnectorError::UnknownTradingPair(pair.symbol().to_string()))?;

        let order_id = Self::next_order_id(request.side, &pair);
        let order = OpenOrder {
            pair,
            side: request.side,
            amount: request.amount,
            price: request.price,
        };

        let (asset, required) = order.reservation();
        let asset = asset.to_string();
        let available = state.available(&asset);
        if required > available {
            warn!(
                connector = %self.name,
                order_id = %order_id,
                asset = %asset,
                %required,
                %available,
                "Paper order rejected: insufficient balance"
            );
            self.emit(LifecycleEvent::failed(
                order_id.clone(),
                Some(format!("insufficient {asset} balance")),
            ));
            return Ok(order_id);
        }

        state.reserve(&asset, required);
        self.emit(LifecycleEvent::created(
            order_id.clone(),
            order.side,
            order.pair.symbol(),
            order.amount,
            order.price,
        ));

        if order.crosses(bid, ask) {
            self.fill(&mut state, order_id.clone(), order);
        } else {
            state.open_orders.insert(order_id.clone(), order);
        }

        Ok(order_id)
    }

    fn cancel_order(&self, trading_pair: &str, order_id: &OrderId) -> ConnectorResult<()> {
        let mut state = self.state.lock();
        let matches_pair = state
            .open_orders
            .get(order_id)
            .is_some_and(|o| o.pair.symbol() == trading_pair);
        if !matches_pair {
            return Err(ConnectorError::OrderNotFound(order_id.to_string()));
        }

        if let Some(order) = state.open_orders.remove(order_id) {
            let (asset, amount) = order.reservation();
            let asset = asset.to_string();
            state.release(&asset, amount);
        }
        self.emit(LifecycleEvent::cancelled(order_id.clone()));
        Ok(())
    }
}
