//! Tick-driven submission gate.
//!
//! The gate waits for the connector to report ready, then builds exactly
//! one limit order request and fires. It stays fired until [`OrderGate::rearm`]
//! is called.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lob_core::{OrderRequest, OrderSide, PriceType, Size};
use lob_telemetry::{Metrics, Notification, Notifier};
use tracing::{debug, info, warn};

use crate::config::StrategyConfig;
use crate::market::MarketInfo;
use crate::oracle::PriceOracle;

/// Whether the gate may still submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePhase {
    #[default]
    Armed,
    Fired,
}

/// Readiness latch plus phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateState {
    /// Latched once the connector first reports ready.
    pub connector_ready: bool,
    pub phase: GatePhase,
}

pub struct OrderGate {
    market: MarketInfo,
    oracle: PriceOracle,
    side: OrderSide,
    amount: Size,
    price_type: PriceType,
    state: GateState,
    notifier: Arc<dyn Notifier>,
}

impl OrderGate {
    pub fn new(market: MarketInfo, config: &StrategyConfig, notifier: Arc<dyn Notifier>) -> Self {
        let oracle = PriceOracle::new(&market);
        Self {
            market,
            oracle,
            side: config.side,
            amount: config.order_size(),
            price_type: config.price_type,
            state: GateState::default(),
            notifier,
        }
    }

    /// Decide whether to submit on this tick.
    ///
    /// Returns the request to hand to the connector, or `None` when the
    /// connector is not ready, the gate has already fired, or no usable
    /// price is available.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> Option<OrderRequest> {
        if !self.poll_readiness(now) {
            return None;
        }

        if self.state.phase == GatePhase::Fired {
            return None;
        }

        let pair = self.market.trading_pair().symbol();
        let price = match self.oracle.price(self.price_type) {
            Ok(price) if price.is_positive() => price,
            Ok(price) => {
                warn!(
                    trading_pair = %pair,
                    price_type = %self.price_type,
                    %price,
                    "Non-positive price, skipping submission"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    trading_pair = %pair,
                    price_type = %self.price_type,
                    error = %e,
                    "Price lookup failed, skipping submission"
                );
                return None;
            }
        };

        let request = OrderRequest::limit(pair, self.side, self.amount, price);
        self.state.phase = GatePhase::Fired;
        debug!(
            trading_pair = %pair,
            side = %self.side,
            amount = %self.amount,
            %price,
            "Order gate fired"
        );
        Some(request)
    }

    /// Allow the next ready tick to submit again.
    pub fn rearm(&mut self) {
        if self.state.phase == GatePhase::Fired {
            debug!(trading_pair = %self.market.trading_pair(), "Order gate rearmed");
        }
        self.state.phase = GatePhase::Armed;
    }

    pub fn connector_ready(&self) -> bool {
        self.state.connector_ready
    }

    pub fn phase(&self) -> GatePhase {
        self.state.phase
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Poll the connector until it first reports ready, then stop polling.
    fn poll_readiness(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.connector_ready {
            return true;
        }

        let connector = self.market.connector();
        if !connector.is_ready() {
            Metrics::connector_ready(false);
            debug!(connector = connector.name(), "Connector not ready");
            self.notifier.notify(&Notification::warning(
                now,
                format!("{} is not ready. Please wait...", connector.name()),
            ));
            return false;
        }

        self.state.connector_ready = true;
        Metrics::connector_ready(true);
        info!(
            connector = connector.name(),
            trading_pair = %self.market.trading_pair(),
            "Connector ready"
        );
        self.notifier.notify(&Notification::info(
            now,
            format!("{} is ready. Trading started", connector.name()),
        ));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lob_connector::{Connector, PaperConfig, PaperConnector};
    use lob_core::{OrderType, Price};
    use lob_telemetry::RecordingNotifier;
    use rust_decimal_macros::dec;

    fn gate_for(
        paper: PaperConfig,
        config: StrategyConfig,
    ) -> (OrderGate, Arc<PaperConnector>, Arc<RecordingNotifier>) {
        let (connector, _events) = PaperConnector::new(paper);
        let connector = Arc::new(connector);
        let notifier = Arc::new(RecordingNotifier::new());
        let market = MarketInfo::new(
            Arc::clone(&connector) as Arc<dyn Connector>,
            &config.trading_pair,
        )
        .unwrap();
        let gate = OrderGate::new(market, &config, Arc::clone(&notifier) as Arc<dyn Notifier>);
        (gate, connector, notifier)
    }

    #[test]
    fn test_not_ready_never_submits() {
        let (mut gate, connector, notifier) =
            gate_for(PaperConfig::default(), StrategyConfig::default());
        connector.set_ready(false);

        for _ in 0..5 {
            assert!(gate.evaluate(Utc::now()).is_none());
        }
        assert!(!gate.connector_ready());
        assert_eq!(gate.phase(), GatePhase::Armed);
        assert_eq!(notifier.count_containing("is not ready"), 5);
        assert_eq!(notifier.count_containing("is ready"), 0);
    }

    #[test]
    fn test_ready_submits_once() {
        let (mut gate, connector, notifier) =
            gate_for(PaperConfig::default(), StrategyConfig::default());
        connector.set_ready(false);
        assert!(gate.evaluate(Utc::now()).is_none());

        connector.set_ready(true);
        let request = gate.evaluate(Utc::now()).unwrap();
        assert_eq!(request.side, OrderSide::Buy);
        assert_eq!(request.amount, Size::new(dec!(0.005)));
        assert_eq!(request.order_type, OrderType::Limit);
        assert_eq!(request.price, Price::new(dec!(30000)));
        assert_eq!(request.trading_pair, "BTC-USDT");
        assert_eq!(gate.phase(), GatePhase::Fired);

        for _ in 0..3 {
            assert!(gate.evaluate(Utc::now()).is_none());
        }
        assert_eq!(notifier.count_containing("paper_trade is ready. Trading started"), 1);
    }

    #[test]
    fn test_readiness_is_latched() {
        let (mut gate, connector, notifier) =
            gate_for(PaperConfig::default(), StrategyConfig::default());
        assert!(gate.evaluate(Utc::now()).is_some());

        connector.set_ready(false);
        gate.rearm();
        assert!(gate.evaluate(Utc::now()).is_some());
        assert_eq!(notifier.count_containing("is not ready"), 0);
    }

    #[test]
    fn test_rearm_allows_exactly_one_more() {
        let (mut gate, _connector, _notifier) =
            gate_for(PaperConfig::default(), StrategyConfig::default());
        assert!(gate.evaluate(Utc::now()).is_some());
        assert!(gate.evaluate(Utc::now()).is_none());

        gate.rearm();
        assert_eq!(gate.phase(), GatePhase::Armed);
        assert!(gate.evaluate(Utc::now()).is_some());
        assert!(gate.evaluate(Utc::now()).is_none());
    }

    #[test]
    fn test_price_type_and_side_follow_config() {
        let config = StrategyConfig {
            side: OrderSide::Sell,
            price_type: PriceType::Bid,
            order_amount: dec!(0.1),
            ..Default::default()
        };
        let (mut gate, _connector, _notifier) = gate_for(PaperConfig::default(), config);

        let request = gate.evaluate(Utc::now()).unwrap();
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(request.price, Price::new(dec!(29990)));
        assert_eq!(request.amount, Size::new(dec!(0.1)));
    }

    #[test]
    fn test_price_is_read_at_evaluation_time() {
        let (mut gate, connector, _notifier) =
            gate_for(PaperConfig::default(), StrategyConfig::default());
        connector.set_quote("BTC-USDT", dec!(31000), dec!(31020));

        let request = gate.evaluate(Utc::now()).unwrap();
        assert_eq!(request.price, Price::new(dec!(31010)));
    }

    #[test]
    fn test_price_failure_keeps_gate_armed() {
        let config = StrategyConfig {
            trading_pair: "ETH-USDT".to_string(),
            ..Default::default()
        };
        let (mut gate, connector, _notifier) = gate_for(PaperConfig::default(), config);

        assert!(gate.evaluate(Utc::now()).is_none());
        assert_eq!(gate.phase(), GatePhase::Armed);
        assert!(gate.connector_ready());

        connector.set_quote("ETH-USDT", dec!(1999), dec!(2001));
        let request = gate.evaluate(Utc::now()).unwrap();
        assert_eq!(request.price, Price::new(dec!(2000)));
    }
}
