// Intake - producer-facing submit use case

pub mod submit;

pub use submit::SubmitRequest;


use std::sync::Arc;

use crate::application::dispatcher::Dispatcher;
use crate::domain::ItemId;
use crate::error::Result;
use crate::port::{IdProvider, TimeProvider};

/// Producer-facing service: stamps items via the injected providers and
/// forwards them to the dispatcher.
pub struct IntakeService {
    dispatcher: Arc<Dispatcher>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl IntakeService {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            dispatcher,
            id_provider,
            time_provider,
        }
    }

    /// Submit a new item
    pub fn submit(&self, req: SubmitRequest) -> Result<ItemId> {
        submit::execute(
            self.dispatcher.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
    }
}
