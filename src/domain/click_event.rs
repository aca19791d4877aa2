//! Click events and the best-effort queue that carries them.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// A redirect that should be reflected in the click counter of `code`.
///
/// Created by the redirect path, sent through a bounded channel and applied
/// by [`crate::domain::click_worker::run_click_worker`], so the HTTP response
/// never waits on the store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Sending half of the click queue.
///
/// [`ClickRecorder::record`] never blocks and never fails the caller. When the
/// queue is full or the worker is gone the click is dropped and logged.
#[derive(Debug, Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickEvent>) -> Self {
        Self { sender }
    }

    /// Creates a recorder together with the receiver the worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Enqueues a click for `code`. Returns `false` if it was dropped.
    pub fn record(&self, code: &str) -> bool {
        match self.sender.try_send(ClickEvent::new(code)) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.code, "Click queue full, click dropped");
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Click queue closed, click dropped");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}
