//! Single-slot delayed-task scheduler.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Holds at most one pending delayed task. Submitting a new task aborts and
/// replaces the pending one, so only the last submission in any window fires.
/// An already-running task is not cancelled; only the not-yet-fired slot is.
#[derive(Debug, Default)]
pub struct Debouncer {
    slot: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Schedule `work` to run after `delay`, superseding any pending work.
    pub fn submit<F>(&mut self, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(pending) = self.slot.take() {
            pending.abort();
            debug!("superseded pending debounced work");
        }
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        }));
    }

    /// Drop any pending work without running it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.slot.take() {
            pending.abort();
        }
    }

    /// Whether a submitted task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.slot.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}
