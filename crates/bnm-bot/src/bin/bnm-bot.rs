//! BNM rates Telegram bot
//!
//! # Usage
//!
//! ```bash
//! export TELEGRAM_BOT_TOKEN="123456:ABC..."
//! cargo run --bin bnm-bot -p bnm-bot -- --log-format json
//! ```

use anyhow::Context;
use bnm_bot::bot::MENU_COMMANDS;
use bnm_bot::{
    BnmClient, BotConfig, Catalog, ChatTransport, HealthCounters, HealthMonitor, RatesBot,
    SystemClock, TelegramClient, TelegramConfig, UpdateCursor, run_forever,
};
use bnm_utils::{LogFormat, init_tracing};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(name = "bnm-bot")]
#[command(about = "Telegram bot for the official BNM exchange rates", long_about = None)]
struct Args {
    /// Log line format: text or json
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn,bnm_bot=info")]
    log_filter: String,

    /// Do not advertise slash commands on startup
    #[arg(long)]
    skip_command_registration: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format, &args.log_filter);

    let config = BotConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "Starting bnm-bot");

    let source = Arc::new(
        BnmClient::new(config.bnm_base_url.clone(), config.request_timeout)
            .context("failed to build rates client")?,
    );
    let catalog = Arc::new(Catalog::builtin().context("invalid message catalog")?);
    let counters = Arc::new(HealthCounters::new());
    let mut bot = RatesBot::new(source, Arc::new(SystemClock), catalog, counters.clone())
        .context("failed to build router")?;

    let telegram = TelegramConfig::new(config.telegram_token.clone(), config.poll_timeout);

    if !args.skip_command_registration {
        let client = TelegramClient::new(telegram.clone())?;
        if let Err(e) = client.register_commands(MENU_COMMANDS).await {
            tracing::warn!(error = %e, "Failed to register slash commands");
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = HealthMonitor::new(config.health_interval, config.memory_warn_bytes)
        .spawn(counters.clone(), shutdown_rx.clone());

    // Outlives every restarted client so acknowledged updates stay acknowledged
    let cursor = UpdateCursor::default();
    let supervisor = run_forever(
        &mut bot,
        || TelegramClient::with_cursor(telegram.clone(), cursor.clone()),
        &config,
        &counters,
        shutdown_rx,
    );

    tokio::select! {
        () = supervisor => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => tracing::info!("Received Ctrl-C, shutting down"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = monitor.await {
        tracing::warn!(error = %e, "Health monitor task failed");
    }

    let health = counters.snapshot();
    tracing::info!(
        messages = health.messages,
        handler_errors = health.handler_errors,
        transport_restarts = health.transport_restarts,
        delivery_failures = health.delivery_failures,
        sessions = bot.sessions().len(),
        "bnm-bot stopped"
    );

    Ok(())
}
