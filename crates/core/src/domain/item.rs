// Item Domain Model

use serde::{Deserialize, Serialize};

/// Item ID (UUID v4 in production, injected via IdProvider)
pub type ItemId = String;

/// Item payload (opaque text carried through the queue untouched)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload(String);

impl ItemPayload {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Item Entity — a unit of work submitted for asynchronous processing.
///
/// Immutable once submitted; the queue never inspects the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub submitted_at: i64, // epoch ms
    pub payload: ItemPayload,
}

impl Item {
    /// Create a new Item
    ///
    /// # Arguments
    ///
    /// * `id` - Unique item ID (injected, not generated)
    /// * `submitted_at` - Submission timestamp in epoch ms (injected, not system time)
    /// * `payload` - Item payload
    pub fn new(id: impl Into<String>, submitted_at: i64, payload: ItemPayload) -> Self {
        Self {
            id: id.into(),
            submitted_at,
            payload,
        }
    }

    /// Create a test item with deterministic ID and timestamp.
    ///
    /// Uses a simple counter for deterministic test IDs (test-1, test-2, ...).
    /// Timestamps start at 1000 and increment by 1000.
    ///
    /// **Note**: This method should only be used in tests. For production code,
    /// always inject ID and time via providers.
    pub fn new_test(payload: impl Into<String>) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(
            format!("test-{}", counter),
            (counter * 1000) as i64,
            ItemPayload::new(payload),
        )
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.payload.as_str())
    }
}
