//! Connector + trading pair the strategy trades on.

use std::fmt;
use std::sync::Arc;

use lob_connector::Connector;
use lob_core::TradingPair;

use crate::error::StrategyResult;

/// Immutable market description: connector handle, pair, base and quote.
#[derive(Clone)]
pub struct MarketInfo {
    connector: Arc<dyn Connector>,
    trading_pair: TradingPair,
}

impl MarketInfo {
    /// Build from a connector and a pair symbol in the connector's format.
    pub fn new(connector: Arc<dyn Connector>, trading_pair: &str) -> StrategyResult<Self> {
        let trading_pair = TradingPair::parse(trading_pair, connector.trading_pair_separator())?;
        Ok(Self {
            connector,
            trading_pair,
        })
    }

    pub fn connector(&self) -> &Arc<dyn Connector> {
        &self.connector
    }

    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    pub fn base_asset(&self) -> &str {
        self.trading_pair.base()
    }

    pub fn quote_asset(&self) -> &str {
        self.trading_pair.quote()
    }
}

impl fmt::Debug for MarketInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketInfo")
            .field("connector", &self.connector.name())
            .field("trading_pair", &self.trading_pair.symbol())
            .finish()
    }
}
