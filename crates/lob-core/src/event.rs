//! Order lifecycle events emitted by connectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{OrderId, OrderSide, OrderType};
use crate::{Price, Size};

/// What happened to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEventKind {
    /// The connector accepted the order and it is live.
    Created {
        side: OrderSide,
        trading_pair: String,
        order_type: OrderType,
        amount: Size,
        price: Price,
    },
    /// A trade happened against the order (partial or full).
    Filled {
        trading_pair: String,
        side: OrderSide,
        price: Price,
        amount: Size,
    },
    /// The order was cancelled.
    Cancelled,
    /// The connector rejected or lost the order.
    Failed {
        #[serde(default)]
        reason: Option<String>,
    },
    /// The order is completely filled.
    Completed { side: OrderSide },
}

impl LifecycleEventKind {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Filled { .. } => "filled",
            Self::Cancelled => "cancelled",
            Self::Failed { .. } => "failed",
            Self::Completed { .. } => "completed",
        }
    }
}

/// Lifecycle event for a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Order the event refers to.
    pub order_id: OrderId,
    /// Connector timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event payload.
    #[serde(flatten)]
    pub kind: LifecycleEventKind,
}

impl LifecycleEvent {
    pub fn new(order_id: impl Into<OrderId>, kind: LifecycleEventKind) -> Self {
        Self {
            order_id: order_id.into(),
            timestamp: Utc::now(),
            kind,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn created(
        order_id: impl Into<OrderId>,
        side: OrderSide,
        trading_pair: impl Into<String>,
        amount: Size,
        price: Price,
    ) -> Self {
        Self::new(
            order_id,
            LifecycleEventKind::Created {
                side,
                trading_pair: trading_pair.into(),
                order_type: OrderType::Limit,
                amount,
                price,
            },
        )
    }

    pub fn filled(
        order_id: impl Into<OrderId>,
        trading_pair: impl Into<String>,
        side: OrderSide,
        price: Price,
        amount: Size,
    ) -> Self {
        Self::new(
            order_id,
            LifecycleEventKind::Filled {
                trading_pair: trading_pair.into(),
                side,
                price,
                amount,
            },
        )
    }

    pub fn cancelled(order_id: impl Into<OrderId>) -> Self {
        Self::new(order_id, LifecycleEventKind::Cancelled)
    }

    pub fn failed(order_id: impl Into<OrderId>, reason: Option<String>) -> Self {
        Self::new(order_id, LifecycleEventKind::Failed { reason })
    }

    pub fn completed(order_id: impl Into<OrderId>, side: OrderSide) -> Self {
        Self::new(order_id, LifecycleEventKind::Completed { side })
    }
}
