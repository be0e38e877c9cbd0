//! Trading pair identification.
//!
//! A trading pair symbol such as `BTC-USDT` names a base asset and a quote
//! asset joined by a connector-defined separator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Separator used by connectors that do not define their own.
pub const DEFAULT_PAIR_SEPARATOR: char = '-';

/// Split a trading pair symbol into `(base, quote)`.
///
/// Returns `None` unless the symbol contains exactly one separator with
/// non-empty symbols on both sides.
pub fn split_trading_pair(symbol: &str, separator: char) -> Option<(&str, &str)> {
    let (base, quote) = symbol.split_once(separator)?;
    if base.is_empty() || quote.is_empty() || quote.contains(separator) {
        return None;
    }
    Some((base, quote))
}

/// A tradable market, e.g. `BTC-USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    symbol: String,
    base: String,
    quote: String,
}

impl TradingPair {
    /// Parse a pair symbol using the given separator.
    pub fn parse(symbol: &str, separator: char) -> Result<Self> {
        let (base, quote) = split_trading_pair(symbol, separator)
            .ok_or_else(|| CoreError::InvalidTradingPair(symbol.to_string()))?;
        Ok(Self {
            symbol: symbol.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }

    /// Full pair symbol as the connector knows it.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Base asset symbol.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote asset symbol.
    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
