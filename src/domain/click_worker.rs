//! Background worker applying queued clicks to the store.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;

/// Drains the click queue until every sender is dropped.
///
/// Up to `concurrency` increments run at once. Store failures are logged and
/// swallowed: click accounting never affects a redirect.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn UrlRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let repository = Arc::clone(&repository);

        tokio::spawn(async move {
            apply_click(repository.as_ref(), &event).await;
            drop(permit);
        });
    }

    // Let in-flight increments finish before reporting shutdown.
    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn apply_click(repository: &dyn UrlRepository, event: &ClickEvent) {
    match repository.increment_clicks(&event.code).await {
        Ok(true) => debug!(code = %event.code, "Click recorded"),
        Ok(false) => debug!(code = %event.code, "Click for unknown code ignored"),
        Err(e) => warn!(code = %event.code, error = %e, "Failed to record click"),
    }
}
