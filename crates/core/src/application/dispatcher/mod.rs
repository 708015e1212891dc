// Dispatcher - owns the item queue and the single consuming loop

pub mod constants;
mod lifecycle;

pub use constants::{DEFAULT_HANDLER_DELAY_MS, GRACEFUL_SHUTDOWN_TIMEOUT};
pub use lifecycle::{DispatcherState, StateToken};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::{Item, ItemQueue};
use crate::error::{AppError, Result};
use crate::port::{ItemHandler, TimeProvider};

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of the dispatcher counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub submitted: u64,
    pub processed: u64,
    pub failed: u64,
}

/// Dispatcher owns the item queue and exactly one background consuming loop.
///
/// `submit` never blocks and never performs the item's work; the loop invokes
/// the handler strictly sequentially, in FIFO order, and survives any handler
/// failure. Intended to be constructed once by the composition root and
/// shared as an `Arc` — not hidden global state.
///
/// Lifecycle: `Created` -> `Running` on construction, `ShuttingDown` while
/// the backlog drains after `shutdown`, `Stopped` once the loop exits.
pub struct Dispatcher {
    queue: Arc<ItemQueue>,
    counters: Arc<Counters>,
    state: StateToken,
    publisher: Arc<lifecycle::StatePublisher>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Create the dispatcher and start its consuming loop immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(handler: Arc<dyn ItemHandler>, time_provider: Arc<dyn TimeProvider>) -> Self {
        let queue = Arc::new(ItemQueue::new());
        let counters = Arc::new(Counters::default());
        let (publisher, state) = lifecycle::state_channel();
        let publisher = Arc::new(publisher);

        let worker = tokio::spawn(run_loop(
            Arc::clone(&queue),
            handler,
            time_provider,
            Arc::clone(&counters),
            Arc::clone(&publisher),
        ));
        publisher.publish(DispatcherState::Running);

        Self {
            queue,
            counters,
            state,
            publisher,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Enqueue an item without waiting on its processing.
    ///
    /// Returns in O(1) regardless of backlog depth or handler latency.
    /// Returns false only once shutdown has begun; the item was not accepted.
    pub fn submit(&self, item: Item) -> bool {
        let item_id = item.id.clone();
        if self.queue.try_enqueue(item) {
            self.counters.submitted.fetch_add(1, Ordering::Relaxed);
            debug!(item_id = %item_id, backlog = self.queue.len(), "Item accepted");
            true
        } else {
            debug!(item_id = %item_id, "Item rejected, queue closed");
            false
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatcherState {
        self.state.current()
    }

    /// Subscribe to lifecycle transitions.
    pub fn subscribe_state(&self) -> StateToken {
        self.state.clone()
    }

    /// Counter snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            processed: self.counters.processed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Items accepted but not yet handed to the handler.
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    /// Stop accepting submits, drain the backlog, await loop termination.
    ///
    /// Idempotent: concurrent or repeated calls wait for the same stop.
    pub async fn shutdown(&self) -> Result<()> {
        let handle = {
            let mut slot = self.worker.lock().expect("dispatcher worker slot poisoned");
            slot.take()
        };

        match handle {
            Some(handle) => {
                self.publisher.publish(DispatcherState::ShuttingDown);
                info!(backlog = self.queue.len(), "Dispatcher shutting down, draining backlog");
                self.queue.close();
                handle
                    .await
                    .map_err(|e| AppError::Internal(format!("consuming loop join failed: {e}")))?;
                Ok(())
            }
            None => {
                // Another caller already took the handle; wait for the loop to stop
                let mut state = self.state.clone();
                state.wait_for(DispatcherState::Stopped).await;
                Ok(())
            }
        }
    }
}

/// The single consuming loop. Exits only when the queue is closed and drained.
async fn run_loop(
    queue: Arc<ItemQueue>,
    handler: Arc<dyn ItemHandler>,
    time_provider: Arc<dyn TimeProvider>,
    counters: Arc<Counters>,
    publisher: Arc<lifecycle::StatePublisher>,
) {
    info!("Dispatch loop started");
    while queue.wait_for_available().await {
        while let Some(item) = queue.try_dequeue() {
            process_item(&handler, &time_provider, &counters, item).await;
        }
    }
    publisher.publish(DispatcherState::Stopped);
    info!("Dispatch loop stopped");
}

/// Invoke the handler for one item, containing any failure to that item.
async fn process_item(
    handler: &Arc<dyn ItemHandler>,
    time_provider: &Arc<dyn TimeProvider>,
    counters: &Counters,
    item: Item,
) {
    let started = time_provider.now_millis();

    let item_arc = Arc::new(item);
    let item_for_exec = Arc::clone(&item_arc);
    let handler = Arc::clone(handler);

    // A panicking handler must not unwind through the loop; the spawned
    // task's JoinHandle catches it instead.
    let handle = tokio::task::spawn(async move { handler.handle(&item_for_exec).await });

    match handle.await {
        Ok(Ok(())) => {
            counters.processed.fetch_add(1, Ordering::Relaxed);
            info!(
                item_id = %item_arc.id,
                duration_ms = time_provider.now_millis() - started,
                "Item processed"
            );
        }
        Ok(Err(e)) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            error!(item_id = %item_arc.id, error = %e, "Item handler failed");
        }
        Err(join_err) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            if join_err.is_panic() {
                error!(item_id = %item_arc.id, "Item handler panicked: {:?}", join_err);
            } else {
                error!(item_id = %item_arc.id, "Item handler cancelled: {:?}", join_err);
            }
        }
    }
}
