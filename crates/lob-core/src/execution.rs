//! Execution-related types for order lifecycle management.
//!
//! This module provides types for:
//! - Submission requests handed to a connector
//! - Order lifecycle states and the transitions allowed between them
//! - The per-order record kept for status and audit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{OrderId, OrderSide, OrderType};
use crate::{Price, Size};

// ============================================================================
// Submission
// ============================================================================

/// Order the strategy asks a connector to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trading pair symbol (e.g. `BTC-USDT`).
    pub trading_pair: String,
    /// Order side.
    pub side: OrderSide,
    /// Amount in base asset.
    pub amount: Size,
    /// Order type.
    pub order_type: OrderType,
    /// Limit price in quote asset.
    pub price: Price,
}

impl OrderRequest {
    /// Create a limit order request.
    #[must_use]
    pub fn limit(
        trading_pair: impl Into<String>,
        side: OrderSide,
        amount: Size,
        price: Price,
    ) -> Self {
        Self {
            trading_pair: trading_pair.into(),
            side,
            amount,
            order_type: OrderType::Limit,
            price,
        }
    }

    /// Quote-denominated value of the request.
    #[must_use]
    pub fn notional(&self) -> rust_decimal::Decimal {
        self.amount.notional(self.price)
    }
}

// ============================================================================
// Order Tracking Types
// ============================================================================

/// State of an order in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderState {
    /// Handed to the connector, no confirmation yet.
    #[default]
    Submitted,
    /// Connector confirmed the order is live.
    Created,
    /// Some but not all of the requested amount has filled.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Cancelled.
    Cancelled,
    /// Rejected or failed at the connector.
    Failed,
}

impl OrderState {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Failed)
    }

    /// Returns true if the order is still working at the connector.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Submitted => 0,
            Self::Created => 1,
            Self::PartiallyFilled => 2,
            Self::Filled | Self::Cancelled | Self::Failed => 3,
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Terminal states are absorbing and states never move backwards
    /// (a late `Created` does not undo a partial fill).
    #[must_use]
    pub fn can_transition_to(&self, next: OrderState) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => write!(f, "SUBMITTED"),
            Self::Created => write!(f, "CREATED"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Record of a single order from submission through completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Connector-assigned order id.
    pub order_id: OrderId,
    /// Trading pair symbol.
    pub trading_pair: String,
    /// Order side.
    pub side: OrderSide,
    /// Requested amount.
    pub amount: Size,
    /// Requested limit price.
    pub price: Price,
    /// Cumulative filled amount.
    pub filled_amount: Size,
    /// Current state.
    pub state: OrderState,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Last state change or fill.
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Create a `Submitted` record for a request the connector accepted.
    #[must_use]
    pub fn from_request(order_id: OrderId, request: &OrderRequest, now: DateTime<Utc>) -> Self {
        Self {
            order_id,
            trading_pair: request.trading_pair.clone(),
            side: request.side,
            amount: request.amount,
            price: request.price,
            filled_amount: Size::ZERO,
            state: OrderState::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next` if the lifecycle allows it.
    ///
    /// Returns true if the state changed.
    pub fn transition(&mut self, next: OrderState, now: DateTime<Utc>) -> bool {
        if !self.state.can_transition_to(next) || self.state == next {
            return false;
        }
        self.state = next;
        self.updated_at = now;
        true
    }

    /// Apply a fill of `amount`.
    ///
    /// The order becomes `Filled` once the cumulative amount reaches the
    /// requested amount (or if no amount was requested), otherwise
    /// `PartiallyFilled`. Fills on a terminal order are ignored.
    pub fn apply_fill(&mut self, amount: Size, now: DateTime<Utc>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.filled_amount += amount;
        self.updated_at = now;
        let next = if self.amount.is_positive() && self.filled_amount < self.amount {
            OrderState::PartiallyFilled
        } else {
            OrderState::Filled
        };
        self.transition(next, now);
        true
    }

    /// Amount still open.
    #[must_use]
    pub fn remaining_amount(&self) -> Size {
        if self.filled_amount >= self.amount {
            Size::ZERO
        } else {
            self.amount - self.filled_amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_record() -> OrderRecord {
        let request = OrderRequest::limit(
            "BTC-USDT",
            OrderSide::Buy,
            Size::new(dec!(0.005)),
            Price::new(dec!(30000)),
        );
        OrderRecord::from_request(OrderId::from("o-1"), &request, Utc::now())
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderState::Filled.is_terminal());
        assert!(OrderState::Cancelled.is_terminal());
        assert!(OrderState::Failed.is_terminal());
        assert!(!OrderState::Submitted.is_terminal());
        assert!(!OrderState::Created.is_terminal());
        assert!(!OrderState::PartiallyFilled.is_terminal());
    }

    #[test]
    fn test_terminal_is_absorbing() {
        for terminal in [OrderState::Filled, OrderState::Cancelled, OrderState::Failed] {
            for next in [
                OrderState::Submitted,
                OrderState::Created,
                OrderState::PartiallyFilled,
                OrderState::Filled,
                OrderState::Cancelled,
                OrderState::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_no_backwards_transition() {
        assert!(!OrderState::PartiallyFilled.can_transition_to(OrderState::Created));
        assert!(OrderState::Submitted.can_transition_to(OrderState::Cancelled));
        assert!(OrderState::Created.can_transition_to(OrderState::PartiallyFilled));
    }

    #[test]
    fn test_partial_then_full_fill() {
        let mut record = sample_record();
        let now = Utc::now();

        record.apply_fill(Size::new(dec!(0.002)), now);
        assert_eq!(record.state, OrderState::PartiallyFilled);
        assert_eq!(record.remaining_amount(), Size::new(dec!(0.003)));

        record.apply_fill(Size::new(dec!(0.003)), now);
        assert_eq!(record.state, OrderState::Filled);
        assert_eq!(record.remaining_amount(), Size::ZERO);
    }

    #[test]
    fn test_fill_after_cancel_ignored() {
        let mut record = sample_record();
        let now = Utc::now();
        assert!(record.transition(OrderState::Cancelled, now));
        assert!(!record.apply_fill(Size::new(dec!(0.005)), now));
        assert_eq!(record.state, OrderState::Cancelled);
        assert_eq!(record.filled_amount, Size::ZERO);
    }

    #[test]
    fn test_request_notional() {
        let request = OrderRequest::limit(
            "BTC-USDT",
            OrderSide::Buy,
            Size::new(dec!(0.005)),
            Price::new(dec!(30000)),
        );
        assert_eq!(request.notional(), dec!(150));
        assert_eq!(request.order_type, OrderType::Limit);
    }
}
