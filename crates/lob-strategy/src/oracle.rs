//! Price lookup for the configured trading pair.
//!
//! Every call goes to the connector. Nothing is cached, so a price read on
//! one tick is never reused on the next.

use std::sync::Arc;

use lob_connector::{Connector, ConnectorResult};
use lob_core::{Price, PriceType};

use crate::market::MarketInfo;

/// Price oracle bound to one connector and pair.
#[derive(Clone)]
pub struct PriceOracle {
    connector: Arc<dyn Connector>,
    trading_pair: String,
}

impl PriceOracle {
    #[must_use]
    pub fn new(market: &MarketInfo) -> Self {
        Self {
            connector: Arc::clone(market.connector()),
            trading_pair: market.trading_pair().symbol().to_string(),
        }
    }

    /// Current price of the given type. Connector errors propagate.
    pub fn price(&self, price_type: PriceType) -> ConnectorResult<Price> {
        self.connector.get_price(&self.trading_pair, price_type)
    }

    pub fn mid_price(&self) -> ConnectorResult<Price> {
        self.price(PriceType::Mid)
    }

    pub fn trading_pair(&self) -> &str {
        &self.trading_pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockVenue;
    use lob_connector::ConnectorError;
    use rust_decimal_macros::dec;

    fn oracle_with(mock: MockVenue) -> PriceOracle {
        let market = MarketInfo::new(Arc::new(mock), "BTC-USDT").unwrap();
        PriceOracle::new(&market)
    }

    #[test]
    fn test_every_call_requeries_connector() {
        let mut mock = MockVenue::new();
        mock.expect_trading_pair_separator().return_const('-');
        let mut calls = 0;
        mock.expect_get_price()
            .withf(|pair: &str, price_type: &PriceType| {
                pair == "BTC-USDT" && *price_type == PriceType::Mid
            })
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                Ok(Price::new(dec!(30000) + rust_decimal::Decimal::from(calls)))
            });

        let oracle = oracle_with(mock);
        assert_eq!(oracle.mid_price().unwrap(), Price::new(dec!(30001)));
        assert_eq!(oracle.mid_price().unwrap(), Price::new(dec!(30002)));
    }

    #[test]
    fn test_price_type_is_forwarded() {
        let mut mock = MockVenue::new();
        mock.expect_trading_pair_separator().return_const('-');
        mock.expect_get_price()
            .withf(|_: &str, price_type: &PriceType| *price_type == PriceType::Ask)
            .times(1)
            .returning(|_, _| Ok(Price::new(dec!(30010))));

        let oracle = oracle_with(mock);
        assert_eq!(
            oracle.price(PriceType::Ask).unwrap(),
            Price::new(dec!(30010))
        );
    }

    #[test]
    fn test_connector_error_propagates() {
        let mut mock = MockVenue::new();
        mock.expect_trading_pair_separator().return_const('-');
        mock.expect_get_price()
            .returning(|pair, _| Err(ConnectorError::UnknownTradingPair(pair.to_string())));

        let oracle = oracle_with(mock);
        assert!(matches!(
            oracle.mid_price(),
            Err(ConnectorError::UnknownTradingPair(p)) if p == "BTC-USDT"
        ));
    }
}
