// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod item_handler;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use item_handler::{HandlerError, ItemHandler};
pub use time_provider::TimeProvider;
