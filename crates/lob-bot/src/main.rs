//! Limit order bot - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Single limit order strategy on a paper connector.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via LOB_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config path: CLI arg > LOB_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("LOB_CONFIG").ok())
        .unwrap_or_else(|| lob_bot::DEFAULT_CONFIG_PATH.to_string());

    let config = lob_bot::AppConfig::load(&config_path)?;

    lob_telemetry::init_logging(&config.telemetry.log_level)?;
    info!("Starting lob-bot v{}", env!("CARGO_PKG_VERSION"));
    info!(config_path = %config_path, "Configuration loaded");

    if args.print_config {
        println!("{config:#?}");
        return Ok(());
    }

    let strategy = lob_bot::Application::new(config).run().await?;
    info!(orders = strategy.orders().len(), "Stopped");

    Ok(())
}
