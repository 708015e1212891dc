// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique item ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

pub mod mocks {
    use super::IdProvider;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Sequential IDs (item-1, item-2, ...) for deterministic tests
    pub struct MockIdProvider {
        counter: AtomicU64,
    }

    impl MockIdProvider {
        pub fn new() -> Self {
            Self {
                counter: AtomicU64::new(1),
            }
        }
    }

    impl Default for MockIdProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdProvider for MockIdProvider {
        fn generate_id(&self) -> String {
            format!("item-{}", self.counter.fetch_add(1, Ordering::SeqCst))
        }
    }
}
