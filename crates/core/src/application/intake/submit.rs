// Submit Use Case

use serde::{Deserialize, Serialize};

use crate::application::dispatcher::Dispatcher;
use crate::domain::{Item, ItemId, ItemPayload};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TimeProvider};

/// Submit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Execute submit use case
///
/// Stamps the item with an injected ID and timestamp, then hands it to the
/// dispatcher. Returns the item ID so callers can correlate log lines.
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher owning the queue
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `req` - Submit request
pub fn execute(
    dispatcher: &Dispatcher,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: SubmitRequest,
) -> Result<ItemId> {
    let item_id = id_provider.generate_id();
    let submitted_at = time_provider.now_millis();

    let item = Item::new(item_id.clone(), submitted_at, ItemPayload::new(req.text));

    if dispatcher.submit(item) {
        Ok(item_id)
    } else {
        Err(AppError::QueueClosed)
    }
}
