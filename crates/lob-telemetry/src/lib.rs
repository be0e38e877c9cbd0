//! Metrics, structured logging and notifications for the limit-order strategy.
//!
//! - Prometheus metrics for ticks, submissions and lifecycle events
//! - Structured logging with tracing (JSON in production)
//! - The injected `Notifier` sink for human-readable notifications

pub mod error;
pub mod logging;
pub mod metrics;
pub mod notify;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use notify::{LogNotifier, Notification, Notifier, NotifyLevel, RecordingNotifier};
