//! Runtime driver for a [`LimitOrderStrategy`].
//!
//! One task owns the strategy and multiplexes the tick timer, the
//! connector's lifecycle events, the status timer and shutdown.

use std::time::Duration;

use chrono::Utc;
use lob_connector::EventReceiver;
use tokio::sync::watch;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::strategy::LimitOrderStrategy;

pub struct Scheduler {
    strategy: LimitOrderStrategy,
    events: EventReceiver,
    tick_interval: Duration,
    status_interval: Option<Duration>,
}

impl Scheduler {
    /// Intervals are taken from the strategy's configuration.
    pub fn new(strategy: LimitOrderStrategy, events: EventReceiver) -> Self {
        let tick_interval = strategy.config().tick_interval();
        let status_interval = strategy.config().status_interval();
        Self {
            strategy,
            events,
            tick_interval,
            status_interval,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_status_interval(mut self, status_interval: Option<Duration>) -> Self {
        self.status_interval = status_interval;
        self
    }

    /// Run until `shutdown` flips to true (or its sender is dropped).
    ///
    /// Returns the strategy so callers can inspect final state.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> LimitOrderStrategy {
        let Self {
            mut strategy,
            mut events,
            tick_interval,
            status_interval,
        } = self;

        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut status = status_interval.map(|period| {
            let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });
        let mut events_open = true;

        info!(
            trading_pair = %strategy.market().trading_pair(),
            tick_ms = tick_interval.as_millis() as u64,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler shutting down");
                        break;
                    }
                }

                maybe_event = events.recv(), if events_open => {
                    match maybe_event {
                        Some(event) => strategy.on_event(&event),
                        None => {
                            warn!("Lifecycle event channel closed");
                            events_open = false;
                        }
                    }
                }

                _ = ticker.tick() => {
                    if let Some(order_id) = strategy.on_tick(Utc::now()) {
                        debug!(order_id = %order_id, "Tick submitted order");
                    }
                }

                _ = next_status(&mut status) => {
                    strategy.report_status(Utc::now());
                }
            }
        }

        // Apply whatever the connector already queued.
        while let Ok(event) = events.try_recv() {
            strategy.on_event(&event);
        }

        strategy
    }
}

async fn next_status(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
