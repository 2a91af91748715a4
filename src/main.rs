//! MexcAlertBridge - Main Entry Point
//!
//! Listens for webhook alerts and turns them into MEXC spot limit orders.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mexc_alert_bridge::alert::AlertParser;
use mexc_alert_bridge::audit::CsvAuditLog;
use mexc_alert_bridge::common::traits::{AuditSink, ExchangeClient};
use mexc_alert_bridge::common::types::TradingMode;
use mexc_alert_bridge::config::load_config;
use mexc_alert_bridge::mexc::{MexcRestClient, PaperExchange};
use mexc_alert_bridge::pipeline::{OrderPipeline, OrderTracker};
use mexc_alert_bridge::server::{self, spawn_keepalive, AppState};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Port for the webhook listener
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let result = if format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (.env, file, environment)
    let config = load_config(Some(&args.config))?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    init_tracing(&level, &config.settings.log_format)?;

    info!("Starting MexcAlertBridge");
    info!("Configuration file: {}", args.config);

    // Exchange: live when credentials are present, paper otherwise
    let market = MexcRestClient::from_config(&config.mexc)?;
    let (exchange, mode): (Arc<dyn ExchangeClient>, TradingMode) = if market.has_credentials() {
        (Arc::new(market), TradingMode::Live)
    } else {
        warn!("MEXC credentials not configured, orders will be simulated");
        (
            Arc::new(PaperExchange::new(Arc::new(market))),
            TradingMode::Simulation,
        )
    };
    info!("Trading mode: {} (exchange: {})", mode, exchange.name());

    let audit: Arc<dyn AuditSink> = Arc::new(CsvAuditLog::open(&config.audit.path)?);

    let (tracker, _dispatcher) =
        OrderTracker::new(Arc::clone(&exchange), Arc::clone(&audit), config.tracker.clone())
            .start();

    let pipeline = OrderPipeline::new(
        AlertParser::new(config.alert.formats.clone()),
        config.risk.clone(),
        exchange,
        audit,
        tracker,
        mode,
    )
    .with_recv_window(config.mexc.recv_window_ms);

    if let Some(url) = config.keepalive.url.clone().filter(|url| !url.is_empty()) {
        spawn_keepalive(url, Duration::from_secs(config.keepalive.interval_seconds))?;
    }

    let port = args.port.unwrap_or(config.server.port);
    server::serve(AppState::new(Arc::new(pipeline)), &config.server.host, port).await?;

    info!("Shutdown complete");
    Ok(())
}
