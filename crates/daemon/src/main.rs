//! Courier - Main Entry Point
//! Demo driver: a console producer feeding the dispatch queue while the
//! background loop drains it one item at a time.

mod notifier;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use courier_core::application::dispatcher::{Dispatcher, GRACEFUL_SHUTDOWN_TIMEOUT};
use courier_core::application::intake::{IntakeService, SubmitRequest};
use courier_core::port::id_provider::UuidProvider;
use courier_core::port::time_provider::SystemTimeProvider;

use notifier::NotificationHandler;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Console line that ends the input loop
const QUIT_LINE: &str = "z";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("Courier v{} starting...", VERSION);

    // Composition root: providers, handler, dispatcher.
    // The dispatcher is the process-wide singleton, owned here and shared
    // explicitly rather than through global state.
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let handler = Arc::new(NotificationHandler::from_env());
    let dispatcher = Arc::new(Dispatcher::new(handler, time_provider.clone()));
    let intake = IntakeService::new(dispatcher.clone(), id_provider, time_provider);

    // Submit a few items faster than the consumer can work them off
    for i in 0..3 {
        let item_id = intake.submit(SubmitRequest { text: i.to_string() })?;
        info!(item_id = %item_id, "Sent - {}", i);
    }

    info!("Enter messages ('{}' to quit, Ctrl+C to abort):", QUIT_LINE);

    // Console producer loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(text) if text == QUIT_LINE => break,
                    Some(text) => {
                        let item_id = intake.submit(SubmitRequest { text: text.clone() })?;
                        info!(item_id = %item_id, "Sent - {}", text);
                    }
                    None => break, // stdin closed
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(backlog = dispatcher.backlog(), "Exiting, draining backlog...");

    // Graceful shutdown: close the queue, drain what is left, bounded wait
    match tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, dispatcher.shutdown()).await {
        Ok(result) => result?,
        Err(_) => warn!(
            timeout_secs = GRACEFUL_SHUTDOWN_TIMEOUT.as_secs(),
            backlog = dispatcher.backlog(),
            "Drain timed out, abandoning backlog"
        ),
    }

    let stats = dispatcher.stats();
    info!(
        submitted = stats.submitted,
        processed = stats.processed,
        failed = stats.failed,
        "Shutdown complete."
    );

    Ok(())
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("COURIER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    // Optional rolling file sink
    let file_layer = match std::env::var("COURIER_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "courier.log");
            Some(fmt::layer().with_ansi(false).with_writer(appender))
        }
        Err(_) => None,
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            registry.with(fmt::layer().json()).init();
        }
        _ => {
            // Development: pretty formatting with colors
            registry.with(fmt::layer().pretty()).init();
        }
    }

    Ok(())
}
