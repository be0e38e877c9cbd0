//! Prometheus metrics for the limit-order strategy.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. Registration only
//! fails on duplicate metric names, which is a programming error that
//! should surface at first use rather than be silently ignored.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_int_gauge, Counter, CounterVec, Encoder,
    IntGauge, TextEncoder,
};

use crate::error::TelemetryResult;

/// Total scheduler ticks handled.
pub static TICKS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("lob_ticks_total", "Total scheduler ticks handled").unwrap()
});

/// Connector readiness as last observed by the order gate (1 = ready).
pub static CONNECTOR_READY: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "lob_connector_ready",
        "Connector readiness as observed by the order gate (1=ready)"
    )
    .unwrap()
});

/// Orders handed to the connector.
/// Labels: side
pub static ORDERS_SUBMITTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "lob_orders_submitted_total",
        "Total orders submitted to the connector",
        &["side"]
    )
    .unwrap()
});

/// Synchronous submission errors returned by the connector.
pub static SUBMIT_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "lob_submit_errors_total",
        "Total synchronous order submission errors"
    )
    .unwrap()
});

/// Lifecycle events consumed.
/// Labels: kind (created/filled/cancelled/failed/completed)
pub static LIFECYCLE_EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "lob_lifecycle_events_total",
        "Total order lifecycle events consumed",
        &["kind"]
    )
    .unwrap()
});

/// Lifecycle events that referenced an order id with no record.
pub static UNKNOWN_ORDER_EVENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "lob_unknown_order_events_total",
        "Lifecycle events referencing an unknown order id",
        &["kind"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a scheduler tick.
    pub fn tick() {
        TICKS_TOTAL.inc();
    }

    /// Set connector readiness.
    pub fn connector_ready(ready: bool) {
        CONNECTOR_READY.set(i64::from(ready));
    }

    /// Record an order submission.
    pub fn order_submitted(side: &str) {
        ORDERS_SUBMITTED_TOTAL.with_label_values(&[side]).inc();
    }

    /// Record a synchronous submission error.
    pub fn submit_error() {
        SUBMIT_ERRORS_TOTAL.inc();
    }

    /// Record a consumed lifecycle event.
    pub fn lifecycle_event(kind: &str) {
        LIFECYCLE_EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record a lifecycle event for an unknown order.
    pub fn unknown_order_event(kind: &str) {
        UNKNOWN_ORDER_EVENTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = LIFECYCLE_EVENTS_TOTAL.with_label_values(&["filled"]).get();
        Metrics::lifecycle_event("filled");
        let after = LIFECYCLE_EVENTS_TOTAL.with_label_values(&["filled"]).get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_connector_ready_gauge() {
        Metrics::connector_ready(true);
        assert_eq!(CONNECTOR_READY.get(), 1);
        Metrics::connector_ready(false);
        assert_eq!(CONNECTOR_READY.get(), 0);
    }

    #[test]
    fn test_render_contains_registered_metric() {
        Metrics::tick();
        let text = Metrics::render().unwrap();
        assert!(text.contains("lob_ticks_total"));
    }
}
