//! Run-wide cooperative cancellation.
//!
//! [`DoneSignal`] is raised once by the coordinator when the last game
//! leaves the manager. Every long-running task checks it at the top of
//! each loop iteration and races it against its own suspension point, so
//! at most one unit of in-flight work completes after it is raised.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A one-shot, shareable "stop now" flag.
#[derive(Debug, Default)]
pub struct DoneSignal {
    /// Set once, never cleared.
    raised: AtomicBool,

    /// Wakes tasks parked in [`wait`](Self::wait).
    notify: Notify,
}

impl DoneSignal {
    /// Create a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every waiting task. Idempotent.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Whether the signal has been raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Resolve once the signal is raised. Returns immediately if it already is.
    pub async fn wait(&self) {
        loop {
            // Register before checking the flag so a concurrent raise()
            // cannot slip between the check and the await.
            let notified = self.notify.notified();
            if self.is_raised() {
                return;
            }
            notified.await;
        }
    }
}
