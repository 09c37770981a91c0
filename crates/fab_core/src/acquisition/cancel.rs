//! Cancellation for pending acquisitions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct CancelState {
    flag: AtomicBool,
    notify: Notify,
}

/// Shared cancellation flag the bridge waits on.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub(crate) fn handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Clear a cancellation left over from an earlier acquisition.
    pub(crate) fn reset(&self) {
        self.state.flag.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel()` has been called on any handle.
    pub(crate) async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Handle for cancelling the pending acquisition of a bridge.
///
/// Cancelling settles the pending acquisition with
/// [`FileAcquisitionError::Cancelled`](super::FileAcquisitionError::Cancelled).
/// A cancel issued while the bridge is idle is cleared by the next
/// acquisition.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.flag.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.flag.load(Ordering::SeqCst)
    }
}
