//! The acquisition flow: prompt, wait, read, decode, deliver.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::cancel::{CancelHandle, CancelToken};
use super::decode::{decode_bytes, normalize_text};
use super::delivery::TextDelivery;
use super::errors::{AcquisitionResult, FileAcquisitionError};
use super::picker::{FilePicker, FileSelection, PickRequest};
use crate::config::{BridgeSettings, DialogSettings};
use crate::models::{BridgeState, DecodeStrategy, DecodedText};

/// Options for one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireOptions {
    pub decode: DecodeStrategy,
    pub title: Option<String>,
    /// Settle with `Cancelled` when the prompt closes empty. When false the
    /// acquisition stays pending until cancelled through a [`CancelHandle`].
    pub settle_on_cancel: bool,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            decode: DecodeStrategy::default(),
            title: None,
            settle_on_cancel: true,
        }
    }
}

impl AcquireOptions {
    pub fn from_settings(bridge: &BridgeSettings, dialog: &DialogSettings) -> Self {
        Self {
            decode: bridge.decode,
            title: dialog.title().map(str::to_owned),
            settle_on_cancel: dialog.settle_on_cancel,
        }
    }
}

/// Acquires the text of one user-chosen file per invocation.
pub struct FileAcquisitionBridge<P> {
    picker: P,
    options: AcquireOptions,
    state: Mutex<BridgeState>,
    cancel: CancelToken,
    invocations: AtomicU64,
}

impl<P: FilePicker> FileAcquisitionBridge<P> {
    pub fn new(picker: P, options: AcquireOptions) -> Self {
        Self {
            picker,
            options,
            state: Mutex::new(BridgeState::Idle),
            cancel: CancelToken::default(),
            invocations: AtomicU64::new(0),
        }
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn options(&self) -> &AcquireOptions {
        &self.options
    }

    pub fn state(&self) -> BridgeState {
        *self.state.lock()
    }

    /// Handle for settling a pending acquisition from elsewhere
    /// (a timeout, a "Cancel" button, a dismissed dialog).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.handle()
    }

    /// Number of acquisitions started so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Prompt for a file and return its decoded text.
    ///
    /// Fails fast with `Busy` if another acquisition is pending.
    pub async fn acquire(&self) -> AcquisitionResult<DecodedText> {
        let _guard = self.begin()?;
        let id = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel.reset();

        let request = PickRequest {
            title: self.options.title.clone(),
        };

        tracing::info!(invocation = id, "Opening file");
        let selection = tokio::select! {
            biased;
            selection = self.picker.pick(&request) => selection,
            () = self.cancel.cancelled() => {
                tracing::info!(invocation = id, "File selection cancelled");
                return Err(FileAcquisitionError::Cancelled);
            }
        };

        let Some(selection) = selection else {
            if !self.options.settle_on_cancel {
                tracing::warn!(
                    invocation = id,
                    "Dialog closed without a file; waiting for explicit cancel"
                );
                self.cancel.cancelled().await;
            }
            tracing::info!(invocation = id, "No file selected");
            return Err(FileAcquisitionError::Cancelled);
        };

        self.set_state(BridgeState::Delivering);
        let name = selection.name();
        tracing::debug!(
            invocation = id,
            file = %name,
            strategy = %self.options.decode,
            "Reading selection"
        );

        let (text, byte_len) = match self.options.decode {
            DecodeStrategy::NativeText => {
                let size = selection.size().await?;
                (normalize_text(selection.read_text().await?), size)
            }
            strategy => {
                let bytes = selection.read_bytes().await?;
                (decode_bytes(&name, &bytes, strategy)?, bytes.len())
            }
        };
        drop(selection);

        tracing::info!(invocation = id, file = %name, bytes = byte_len, "File acquired");
        Ok(DecodedText::new(text, name, byte_len))
    }

    /// Acquire and hand the outcome to `delivery`.
    ///
    /// Failures are delivered too, so the host always hears back. A request
    /// rejected with `Busy` is returned to the caller instead: the delivery
    /// channel belongs to the acquisition already pending.
    pub async fn acquire_and_deliver<D>(&self, delivery: &D) -> AcquisitionResult<()>
    where
        D: TextDelivery + ?Sized,
    {
        match self.acquire().await {
            Ok(text) => delivery.deliver(text),
            Err(FileAcquisitionError::Busy) => return Err(FileAcquisitionError::Busy),
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::error!("File acquisition failed: {}", e);
                }
                delivery.fail(&e);
            }
        }
        Ok(())
    }

    fn set_state(&self, state: BridgeState) {
        *self.state.lock() = state;
    }

    fn begin(&self) -> AcquisitionResult<StateGuard<'_>> {
        let mut state = self.state.lock();
        if *state != BridgeState::Idle {
            tracing::warn!("Rejecting file request while {}", *state);
            return Err(FileAcquisitionError::Busy);
        }
        *state = BridgeState::WaitingForSelection;
        Ok(StateGuard { state: &self.state })
    }
}

/// Returns the bridge to `Idle` however the acquisition ends,
/// including when its future is dropped.
struct StateGuard<'a> {
    state: &'a Mutex<BridgeState>,
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = BridgeState::Idle;
    }
}
