//! Placeholder notification handler
//!
//! Stands in for the real delivery side effect (e.g. broadcasting a message
//! to connected clients): sleeps a configurable delay, then logs the item.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use courier_core::application::dispatcher::DEFAULT_HANDLER_DELAY_MS;
use courier_core::domain::Item;
use courier_core::port::{HandlerError, ItemHandler};

/// Simulated delivery latency env var (milliseconds)
const DELAY_ENV: &str = "COURIER_HANDLER_DELAY_MS";

pub struct NotificationHandler {
    delay: Duration,
}

impl NotificationHandler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Read the simulated delivery latency from the environment.
    pub fn from_env() -> Self {
        let millis = std::env::var(DELAY_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HANDLER_DELAY_MS);
        Self::new(Duration::from_millis(millis))
    }
}

#[async_trait]
impl ItemHandler for NotificationHandler {
    async fn handle(&self, item: &Item) -> Result<(), HandlerError> {
        // Simulating that the work takes quite a bit of time
        sleep(self.delay).await;
        info!(item_id = %item.id, "Completed - {}", item);
        Ok(())
    }
}
