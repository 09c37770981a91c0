//! Host-side receiver for pushed strings.
//!
//! With callback delivery the bridge calls an exported `string_response`
//! function instead of returning. The host arms a [`ResponseSlot`] before
//! invoking the entry point, the export fills it, and the host picks the
//! string up once per frame or by awaiting it.

use parking_lot::Mutex;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// One-shot slot filled by the `string_response` export.
#[derive(Debug)]
pub struct ResponseSlot {
    sender: Mutex<Option<oneshot::Sender<String>>>,
}

impl ResponseSlot {
    /// Create an empty slot. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            sender: parking_lot::const_mutex(None),
        }
    }

    /// Prepare to receive the next response.
    ///
    /// Replaces any previous waiter; its [`PendingResponse`] reports
    /// [`ResponseStatus::Abandoned`].
    pub fn arm(&self) -> PendingResponse {
        let (tx, rx) = oneshot::channel();
        if self.sender.lock().replace(tx).is_some() {
            tracing::debug!("Re-armed response slot; previous waiter abandoned");
        }
        PendingResponse { rx }
    }

    /// Hand `text` to the armed waiter.
    ///
    /// Returns false when nobody is waiting; the response is dropped.
    pub fn respond(&self, text: String) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            tracing::warn!("Received a response, but no waiter was armed");
            return false;
        };
        if sender.send(text).is_err() {
            tracing::warn!("Response waiter went away before the response arrived");
            return false;
        }
        true
    }
}

impl Default for ResponseSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of polling a [`PendingResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Pending,
    Ready(String),
    /// The slot was re-armed or dropped before a response arrived.
    Abandoned,
}

/// Receiving end of an armed [`ResponseSlot`].
#[derive(Debug)]
pub struct PendingResponse {
    rx: oneshot::Receiver<String>,
}

impl PendingResponse {
    /// Check for the response without waiting. Suitable for frame loops.
    pub fn poll_once(&mut self) -> ResponseStatus {
        match self.rx.try_recv() {
            Ok(text) => ResponseStatus::Ready(text),
            Err(TryRecvError::Empty) => ResponseStatus::Pending,
            Err(TryRecvError::Closed) => ResponseStatus::Abandoned,
        }
    }

    /// Wait for the response. `None` if the waiter was abandoned.
    pub async fn wait(self) -> Option<String> {
        self.rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SLOT: ResponseSlot = ResponseSlot::new();

    #[test]
    fn respond_fills_armed_slot() {
        let slot = ResponseSlot::new();
        let mut pending = slot.arm();
        assert_eq!(pending.poll_once(), ResponseStatus::Pending);

        assert!(slot.respond("file contents".to_string()));
        assert!(!slot.respond("second".to_string()));
        assert_eq!(
            pending.poll_once(),
            ResponseStatus::Ready("file contents".to_string())
        );
    }

    #[test]
    fn response_without_waiter_is_ignored() {
        let slot = ResponseSlot::new();
        assert!(!slot.respond("stray".to_string()));
    }

    #[test]
    fn rearming_abandons_previous_waiter() {
        let slot = ResponseSlot::new();
        let mut first = slot.arm();
        let mut second = slot.arm();

        assert_eq!(first.poll_once(), ResponseStatus::Abandoned);
        slot.respond("two".to_string());
        assert_eq!(second.poll_once(), ResponseStatus::Ready("two".to_string()));
    }

    #[tokio::test]
    async fn static_slot_can_be_awaited() {
        let pending = SLOT.arm();
        SLOT.respond("from static".to_string());
        assert_eq!(pending.wait().await, Some("from static".to_string()));
    }
}
