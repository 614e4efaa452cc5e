//! SignalBridge - Main Entry Point
//!
//! Receives trading signals over HTTP, sizes them against the configured
//! budgets and Bybit's trading rules, and reports to the operator channel.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use signal_bridge::common::traits::{NotificationTransport, Notifier};
use signal_bridge::config::{load_config, load_from_env};
use signal_bridge::server::run_server;
use signal_bridge::{
    AppConfig, AppState, BudgetSizeCalculator, BybitClient, DryRunSubmitter, LogTransport,
    NotificationDispatcher, OrderValidator, SignalPipeline, TelegramTransport,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Override the bind address, e.g. 127.0.0.1:5000
    #[arg(long, env = "BIND_ADDRESS")]
    bind: Option<String>,

    /// Acknowledge accepted intents locally
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting SignalBridge");

    dotenvy::dotenv().ok();

    let config = if Path::new(&args.config).exists() {
        info!("Configuration file: {}", args.config);
        load_config(Some(&args.config))?
    } else {
        info!("No configuration file at {}, reading environment", args.config);
        load_from_env()?
    };

    let bind_address = args
        .bind
        .clone()
        .unwrap_or_else(|| config.server.bind_address.clone());
    let dry_run = args.dry_run || config.settings.dry_run;

    let (dispatcher, dispatcher_handle) = start_dispatcher(&config)?;
    let notifier: Arc<dyn Notifier> = Arc::new(dispatcher.clone());

    let venue = BybitClient::new(&config.venue)?;
    match venue.check_health().await {
        Ok(true) => info!("Bybit REST reachable at {}", config.venue.rest_url),
        _ => warn!("Bybit REST unreachable, signals will use conservative precision"),
    }

    let sizer = BudgetSizeCalculator::new(config.sizing.clone())
        .context("invalid sizing policy")?;
    let mut pipeline = SignalPipeline::new(
        Arc::new(venue),
        Box::new(sizer),
        OrderValidator::new(config.validation.clone()),
        notifier,
    );
    if dry_run {
        info!("Dry run: accepted intents are acknowledged locally");
        pipeline = pipeline.with_submitter(Arc::new(DryRunSubmitter::new()));
    }

    run_server(&bind_address, AppState::new(pipeline)).await?;

    // Dropping the last producer lets the worker drain and stop
    drop(dispatcher);
    if let Err(e) = dispatcher_handle.await {
        warn!("Notification worker ended abnormally: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}

fn start_dispatcher(
    config: &AppConfig,
) -> Result<(NotificationDispatcher, tokio::task::JoinHandle<()>)> {
    let transport: Arc<dyn NotificationTransport> = match &config.telegram {
        Some(telegram) => {
            info!("Notifications go to Telegram chat {}", telegram.chat_id);
            Arc::new(TelegramTransport::new(telegram)?)
        }
        None => {
            warn!("Telegram not configured, notifications are only logged");
            Arc::new(LogTransport)
        }
    };
    Ok(NotificationDispatcher::spawn(
        transport,
        &config.notifications,
    ))
}
