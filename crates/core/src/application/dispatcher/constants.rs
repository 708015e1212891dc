// Dispatcher constants (no magic values)
use std::time::Duration;

/// Bound on waiting for the consuming loop to drain during shutdown (5s)
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default simulated delivery latency for the placeholder handler (1s)
pub const DEFAULT_HANDLER_DELAY_MS: u64 = 1000;
