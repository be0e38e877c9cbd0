//! Human-readable notification sink.
//!
//! Components receive an `Arc<dyn Notifier>` at construction and push one
//! single-line notification per notable transition (readiness change,
//! submission, lifecycle event, status report). Structured `tracing` logs
//! are emitted separately by the components themselves.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyLevel {
    Info,
    Warning,
}

/// A single-line, timestamped notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn info(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level: NotifyLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level: NotifyLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

/// Destination for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Forwards notifications to `tracing` under the `lob::notify` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotifyLevel::Info => info!(target: "lob::notify", "{notification}"),
            NotifyLevel::Warning => warn!(target: "lob::notify", "{notification}"),
        }
    }
}

/// Keeps every notification in memory. Used by tests and the CLI summary.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Messages (without timestamps) received so far.
    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    /// Number of notifications whose message contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.message.contains(needle))
            .count()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().push(notification.clone());
    }
}
