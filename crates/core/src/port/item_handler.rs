// Item Handler Port
// Abstraction over the work performed for each dequeued item

use crate::domain::Item;
use async_trait::async_trait;
use thiserror::Error;

/// Handler errors
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Handler timeout after {0}ms")]
    Timeout(i64),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Item Handler trait
///
/// Supplied by the embedding application. The dispatcher invokes it exactly
/// once per accepted item, in FIFO order, never concurrently with itself, so
/// implementations need not be re-entrant. The handler may perform blocking
/// or long-latency work; its latency affects only backlog depth, never
/// submit latency.
///
/// # Errors
/// A returned error marks that single item as failed; the dispatcher logs it
/// and moves on to the next item.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    /// Process one item.
    async fn handle(&self, item: &Item) -> Result<(), HandlerError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Mock handler behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Succeed after sleeping (simulates slow delivery)
        Delay(Duration),
        /// Always fail with message
        Fail(String),
        /// Fail only for the given payloads
        FailOn(Vec<String>),
        /// Panic only for the given payloads (for containment testing)
        PanicOn(Vec<String>),
    }

    /// One completed invocation (panicked calls never record an exit)
    #[derive(Debug, Clone)]
    pub struct HandledCall {
        pub item: Item,
        pub entered_at: Instant,
        pub exited_at: Instant,
    }

    /// Mock Item Handler for testing
    ///
    /// Records every completed call with entry/exit instants and tracks a
    /// concurrency watermark so tests can assert invocations never overlap.
    pub struct MockItemHandler {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<HandledCall>>>,
        call_count: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl MockItemHandler {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
                call_count: Arc::new(AtomicUsize::new(0)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_delay(delay: Duration) -> Self {
            Self::new(MockBehavior::Delay(delay))
        }

        /// Number of times `handle` was entered (panicked calls included).
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Completed calls in invocation order.
        pub fn calls(&self) -> Vec<HandledCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Payloads of completed calls, in invocation order.
        pub fn handled_payloads(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.item.payload.as_str().to_string())
                .collect()
        }

        /// Highest number of simultaneously active invocations observed.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    /// Decrements the in-flight gauge on drop so a panicking call still
    /// releases its slot during unwind.
    struct InFlightGuard {
        in_flight: Arc<AtomicUsize>,
    }

    impl InFlightGuard {
        fn enter(in_flight: &Arc<AtomicUsize>, max_in_flight: &Arc<AtomicUsize>) -> Self {
            let active = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(active, Ordering::SeqCst);
            Self {
                in_flight: Arc::clone(in_flight),
            }
        }
    }

    impl Drop for InFlightGuard {
        fn drop(&mut self) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ItemHandler for MockItemHandler {
        async fn handle(&self, item: &Item) -> Result<(), HandlerError> {
            let entered_at = Instant::now();
            let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);
            self.call_count.fetch_add(1, Ordering::SeqCst);

            let behavior = self.behavior.lock().unwrap().clone();
            let outcome = match behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Delay(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(())
                }
                MockBehavior::Fail(msg) => Err(HandlerError::DeliveryFailed(msg)),
                MockBehavior::FailOn(payloads) => {
                    if payloads.iter().any(|p| p == item.payload.as_str()) {
                        Err(HandlerError::DeliveryFailed(format!(
                            "refused payload {}",
                            item.payload.as_str()
                        )))
                    } else {
                        Ok(())
                    }
                }
                MockBehavior::PanicOn(payloads) => {
                    if payloads.iter().any(|p| p == item.payload.as_str()) {
                        panic!("mock panic on {}", item.payload.as_str());
                    }
                    Ok(())
                }
            };

            self.calls.lock().unwrap().push(HandledCall {
                item: item.clone(),
                entered_at,
                exited_at: Instant::now(),
            });

            outcome
        }
    }
}
