//! Main application orchestration.
//!
//! Builds the paper connector, the notifier and the strategy from
//! [`AppConfig`], then runs the scheduler until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use lob_connector::{Connector, PaperConnector};
use lob_strategy::{LimitOrderStrategy, MarketInfo, Scheduler};
use lob_telemetry::{LogNotifier, Notifier};
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
pub struct Application {
    config: AppConfig,
    notifier: Arc<dyn Notifier>,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    /// Use a custom notification sink instead of the log.
    pub fn with_notifier(config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self { config, notifier }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<LimitOrderStrategy> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Run until `shutdown` completes, then return the strategy.
    pub async fn run_until<F>(self, shutdown: F) -> AppResult<LimitOrderStrategy>
    where
        F: Future<Output = ()>,
    {
        let (connector, events) = PaperConnector::new(self.config.paper.clone());
        let connector: Arc<dyn Connector> = Arc::new(connector);
        let market = MarketInfo::new(Arc::clone(&connector), &self.config.strategy.trading_pair)?;
        let strategy =
            LimitOrderStrategy::new(market, self.config.strategy.clone(), self.notifier)?;

        info!(
            connector = connector.name(),
            trading_pair = %self.config.strategy.trading_pair,
            side = %self.config.strategy.side,
            amount = %self.config.strategy.order_amount,
            price_type = %self.config.strategy.price_type,
            "Application started"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Scheduler::new(strategy, events).run(shutdown_rx));

        shutdown.await;
        info!("Shutdown signal received");
        // Receiver gone means the scheduler already stopped; the join below reports it.
        let _ = shutdown_tx.send(true);

        let strategy = handle.await?;
        info!(
            orders = strategy.orders().len(),
            "Final status:\n{}",
            strategy.format_status()
        );
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use lob_core::OrderState;
    use lob_strategy::StrategyConfig;
    use lob_telemetry::RecordingNotifier;
    use std::time::Duration;

    fn fast_config() -> AppConfig {
        AppConfig {
            strategy: StrategyConfig {
                tick_interval_ms: 10,
                status_interval_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_submits_one_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let app =
            Application::with_notifier(fast_config(), Arc::clone(&notifier) as Arc<dyn Notifier>);

        let strategy = app
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap();

        let orders = strategy.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].state, OrderState::Created);
        assert_eq!(notifier.count_containing("paper_trade is ready. Trading started"), 1);
        assert_eq!(notifier.count_containing("has been created"), 1);
    }

    #[tokio::test]
    async fn test_malformed_pair_fails_at_startup() {
        let mut config = fast_config();
        config.strategy.trading_pair = "BTCUSDT".to_string();

        let result = Application::new(config).run_until(async {}).await;
        assert!(matches!(result, Err(AppError::Strategy(_))));
    }
}
