//! Balance and valuation snapshot for the base/quote pair.

use std::sync::Arc;

use lob_connector::{Connector, ConnectorResult};
use lob_core::Price;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::market::MarketInfo;
use crate::oracle::PriceOracle;

/// Returned by the status query while the connector is not ready.
pub const NOT_READY_STATUS: &str = "Exchange connector(s) are not ready.";

/// Balances and valuation of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBalance {
    pub asset: String,
    /// Total balance.
    pub total: Decimal,
    /// Balance not reserved by open orders.
    pub available: Decimal,
    /// Value of `total` in the quote asset.
    pub value: Decimal,
    /// Fraction of total portfolio value, in `[0, 1]`.
    pub share: Decimal,
}

/// Snapshot of the base and quote holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioReport {
    pub base: AssetBalance,
    pub quote: AssetBalance,
    /// Mid price used for valuation.
    pub mid_price: Price,
}

/// Outcome of a snapshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioStatus {
    NotReady,
    Ready(PortfolioReport),
}

/// Split total value into `(base_share, quote_share)`.
///
/// Both shares are zero when the total is not positive. Otherwise the quote
/// share is the complement of the base share, so the two always sum to one.
pub fn value_shares(base_value: Decimal, quote_value: Decimal) -> (Decimal, Decimal) {
    let total = base_value + quote_value;
    if total <= Decimal::ZERO {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let base_share = base_value / total;
    (base_share, Decimal::ONE - base_share)
}

impl PortfolioReport {
    /// Total portfolio value in the quote asset.
    pub fn total_value(&self) -> Decimal {
        self.base.value + self.quote.value
    }

    /// Render the status table: a header row plus total, available, value
    /// and share rows, one column per asset.
    pub fn format_table(&self) -> String {
        let rows = [
            [
                String::new(),
                self.base.asset.clone(),
                self.quote.asset.clone(),
            ],
            [
                "Total Balance".to_string(),
                format_amount(self.base.total),
                format_amount(self.quote.total),
            ],
            [
                "Available Balance".to_string(),
                format_amount(self.base.available),
                format_amount(self.quote.available),
            ],
            [
                format!("Current Value ({})", self.quote.asset),
                format_amount(self.base.value),
                format_amount(self.quote.value),
            ],
            [
                "Current %".to_string(),
                format_share(self.base.share),
                format_share(self.quote.share),
            ],
        ];

        let mut widths = [0usize; 3];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        rows.iter()
            .map(|[label, base, quote]| {
                format!(
                    "    {label:<w0$}  {base:>w1$}  {quote:>w2$}",
                    w0 = widths[0],
                    w1 = widths[1],
                    w2 = widths[2]
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One-line summary for notifications.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} ({}) | {} {} ({}) | mid {}",
            self.base.asset,
            format_amount(self.base.total),
            format_share(self.base.share),
            self.quote.asset,
            format_amount(self.quote.total),
            format_share(self.quote.share),
            self.mid_price
        )
    }
}

// `{:.N}` on a Decimal truncates, so round explicitly first.
fn format_amount(value: Decimal) -> String {
    format!(
        "{:.4}",
        value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn format_share(share: Decimal) -> String {
    let percent = (share * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", percent)
}

/// Computes [`PortfolioReport`]s from connector balances and the mid price.
#[derive(Clone)]
pub struct PortfolioView {
    connector: Arc<dyn Connector>,
    base_asset: String,
    quote_asset: String,
    oracle: PriceOracle,
}

impl PortfolioView {
    #[must_use]
    pub fn new(market: &MarketInfo) -> Self {
        Self {
            connector: Arc::clone(market.connector()),
            base_asset: market.base_asset().to_string(),
            quote_asset: market.quote_asset().to_string(),
            oracle: PriceOracle::new(market),
        }
    }

    /// Take a snapshot.
    ///
    /// `connector_ready` is the strategy's latched readiness observation;
    /// when it is false no connector query is made.
    pub fn snapshot(&self, connector_ready: bool) -> ConnectorResult<PortfolioStatus> {
        if !connector_ready {
            return Ok(PortfolioStatus::NotReady);
        }

        let mid_price = self.oracle.mid_price()?;
        let base_total = self.connector.get_balance(&self.base_asset)?;
        let quote_total = self.connector.get_balance(&self.quote_asset)?;
        let base_available = self.connector.get_available_balance(&self.base_asset)?;
        let quote_available = self.connector.get_available_balance(&self.quote_asset)?;

        let base_value = base_total * mid_price.inner();
        let (base_share, quote_share) = value_shares(base_value, quote_total);

        Ok(PortfolioStatus::Ready(PortfolioReport {
            base: AssetBalance {
                asset: self.base_asset.clone(),
                total: base_total,
                available: base_available,
                value: base_value,
                share: base_share,
            },
            quote: AssetBalance {
                asset: self.quote_asset.clone(),
                total: quote_total,
                available: quote_available,
                value: quote_total,
                share: quote_share,
            },
            mid_price,
        }))
    }
}
