//! Single limit order strategy.
//!
//! Ties the order gate, lifecycle reducer and portfolio view to one
//! connector and trading pair. All methods take `&mut self` or `&self`; the
//! [`Scheduler`](crate::Scheduler) owns the strategy so ticks and events
//! never interleave.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lob_core::{LifecycleEvent, OrderId, OrderRecord, PriceType};
use lob_telemetry::{Metrics, Notification, Notifier};
use tracing::{debug, error, info};

use crate::config::StrategyConfig;
use crate::error::StrategyResult;
use crate::gate::{GatePhase, OrderGate};
use crate::market::MarketInfo;
use crate::oracle::PriceOracle;
use crate::portfolio::{PortfolioStatus, PortfolioView, NOT_READY_STATUS};
use crate::reducer::LifecycleReducer;

pub struct LimitOrderStrategy {
    market: MarketInfo,
    config: StrategyConfig,
    gate: OrderGate,
    reducer: LifecycleReducer,
    oracle: PriceOracle,
    portfolio: PortfolioView,
    notifier: Arc<dyn Notifier>,
}

impl LimitOrderStrategy {
    pub fn new(
        market: MarketInfo,
        config: StrategyConfig,
        notifier: Arc<dyn Notifier>,
    ) -> StrategyResult<Self> {
        config.validate()?;
        let gate = OrderGate::new(market.clone(), &config, Arc::clone(&notifier));
        let reducer = LifecycleReducer::new(market.connector().trading_pair_separator());
        let oracle = PriceOracle::new(&market);
        let portfolio = PortfolioView::new(&market);
        Ok(Self {
            market,
            config,
            gate,
            reducer,
            oracle,
            portfolio,
            notifier,
        })
    }

    /// Handle one scheduler tick.
    ///
    /// Returns the id of the order submitted on this tick, if any. The id is
    /// registered with the reducer before this returns, so every event the
    /// connector emits for it finds a record.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<OrderId> {
        Metrics::tick();

        let request = self.gate.evaluate(now);
        if self.gate.connector_ready() {
            self.log_prices();
        }
        let request = request?;

        let connector = self.market.connector();
        match connector.submit_order(&request) {
            Ok(order_id) => {
                Metrics::order_submitted(&request.side.to_string());
                info!(
                    connector = connector.name(),
                    order_id = %order_id,
                    trading_pair = %request.trading_pair,
                    side = %request.side,
                    amount = %request.amount,
                    price = %request.price,
                    "Order submitted"
                );
                self.reducer.register(order_id.clone(), &request, now);
                self.notifier.notify(&Notification::info(
                    now,
                    format!(
                        "Submitted limit {} order {} ({} {} @ {})",
                        request.side,
                        order_id,
                        request.amount,
                        self.market.base_asset(),
                        request.price
                    ),
                ));
                Some(order_id)
            }
            Err(e) => {
                Metrics::submit_error();
                error!(
                    connector = connector.name(),
                    trading_pair = %request.trading_pair,
                    error = %e,
                    "Order submission failed"
                );
                self.notifier.notify(&Notification::warning(
                    now,
                    format!("Order submission on {} failed: {e}", connector.name()),
                ));
                None
            }
        }
    }

    /// Apply a lifecycle event and forward its notification.
    pub fn on_event(&mut self, event: &LifecycleEvent) {
        let notification = self.reducer.on_event(event);
        self.notifier.notify(&notification);
    }

    /// Balance table, or a one-line message when it cannot be built.
    pub fn format_status(&self) -> String {
        match self.portfolio.snapshot(self.gate.connector_ready()) {
            Ok(PortfolioStatus::NotReady) => NOT_READY_STATUS.to_string(),
            Ok(PortfolioStatus::Ready(report)) => {
                let mut lines = vec![
                    format!(
                        "Market: {} on {}",
                        self.market.trading_pair(),
                        self.market.connector().name()
                    ),
                    String::new(),
                    "  Balances:".to_string(),
                    report.format_table(),
                ];
                let orders = self.reducer.orders();
                if !orders.is_empty() {
                    lines.push(String::new());
                    lines.push("  Orders:".to_string());
                    lines.extend(orders.iter().map(format_order));
                }
                lines.join("\n")
            }
            Err(e) => format!("Status unavailable: {e}"),
        }
    }

    /// Push a one-line portfolio summary to the notifier.
    pub fn report_status(&self, now: DateTime<Utc>) {
        match self.portfolio.snapshot(self.gate.connector_ready()) {
            Ok(PortfolioStatus::NotReady) => {
                debug!("Status report skipped, connector not ready");
            }
            Ok(PortfolioStatus::Ready(report)) => {
                let summary = report.summary_line();
                info!(
                    trading_pair = %self.market.trading_pair(),
                    total_value = %report.total_value(),
                    orders = self.reducer.len(),
                    active = self.reducer.active_count(),
                    "Status report"
                );
                self.notifier.notify(&Notification::info(now, summary));
            }
            Err(e) => {
                self.notifier
                    .notify(&Notification::warning(now, format!("Status unavailable: {e}")));
            }
        }
    }

    /// Allow one more submission.
    pub fn rearm(&mut self) {
        self.gate.rearm();
    }

    pub fn phase(&self) -> GatePhase {
        self.gate.phase()
    }

    pub fn connector_ready(&self) -> bool {
        self.gate.connector_ready()
    }

    pub fn reducer(&self) -> &LifecycleReducer {
        &self.reducer
    }

    /// Owned snapshot of every tracked order.
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.reducer.orders()
    }

    pub fn market(&self) -> &MarketInfo {
        &self.market
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Debug summary of the current book prices.
    fn log_prices(&self) {
        let mid = self.oracle.price(PriceType::Mid);
        let bid = self.oracle.price(PriceType::Bid);
        let ask = self.oracle.price(PriceType::Ask);
        match (mid, bid, ask) {
            (Ok(mid), Ok(bid), Ok(ask)) => debug!(
                trading_pair = %self.market.trading_pair(),
                %mid,
                %bid,
                %ask,
                "Price summary"
            ),
            (mid, bid, ask) => debug!(
                trading_pair = %self.market.trading_pair(),
                mid_ok = mid.is_ok(),
                bid_ok = bid.is_ok(),
                ask_ok = ask.is_ok(),
                "Price summary incomplete"
            ),
        }
    }
}

fn format_order(record: &OrderRecord) -> String {
    format!(
        "    {} {} {} @ {} filled {} [{}]",
        record.order_id, record.side, record.amount, record.price, record.filled_amount, record.state
    )
}
