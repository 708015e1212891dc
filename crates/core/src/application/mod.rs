// Application Layer - Use Cases and the consuming loop

pub mod dispatcher;
pub mod intake;

// Re-exports
pub use dispatcher::{Dispatcher, DispatcherState, StatsSnapshot};
pub use intake::{IntakeService, SubmitRequest};
