//! Delivery of acquired text to the host.
//!
//! Two conventions exist: the entry point returns the text
//! ([`ReturnValueDelivery`]), or the bridge pushes it into a host export
//! ([`CallbackDelivery`]). Both are told about failures too, so the host
//! always learns the outcome.

use parking_lot::Mutex;

use super::errors::{AcquisitionResult, FileAcquisitionError};
use super::response::ResponseSlot;
use crate::models::{DecodedText, DeliveryMode};

/// Hands the outcome of one acquisition to the host.
pub trait TextDelivery {
    /// Deliver successfully decoded text.
    fn deliver(&self, text: DecodedText);

    /// Report that the acquisition ended without text.
    fn fail(&self, error: &FileAcquisitionError);
}

/// Callback receiving delivered strings.
pub type StringCallback = Box<dyn Fn(String) + Send + Sync>;

/// Callback receiving acquisition errors.
pub type ErrorCallback = Box<dyn Fn(&FileAcquisitionError) + Send + Sync>;

/// Keeps the outcome for the entry point to return.
#[derive(Debug, Default)]
pub struct ReturnValueDelivery {
    slot: Mutex<Option<AcquisitionResult<DecodedText>>>,
}

impl ReturnValueDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the stored outcome, leaving the slot empty.
    pub fn take(&self) -> Option<AcquisitionResult<DecodedText>> {
        self.slot.lock().take()
    }

    fn store(&self, outcome: AcquisitionResult<DecodedText>) {
        if self.slot.lock().replace(outcome).is_some() {
            tracing::warn!("Overwriting an outcome the host never collected");
        }
    }
}

impl TextDelivery for ReturnValueDelivery {
    fn deliver(&self, text: DecodedText) {
        self.store(Ok(text));
    }

    fn fail(&self, error: &FileAcquisitionError) {
        self.store(Err(error.clone()));
    }
}

/// Pushes text into a host callback.
pub struct CallbackDelivery {
    on_text: StringCallback,
    on_error: Option<ErrorCallback>,
}

impl CallbackDelivery {
    pub fn new(on_text: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            on_text: Box::new(on_text),
            on_error: None,
        }
    }

    /// Route failures to `on_error` instead of pushing an empty string.
    pub fn with_error_callback(
        mut self,
        on_error: impl Fn(&FileAcquisitionError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Deliver into a host-side response slot.
    pub fn to_slot(slot: &'static ResponseSlot) -> Self {
        Self::new(move |text| {
            slot.respond(text);
        })
    }
}

impl TextDelivery for CallbackDelivery {
    fn deliver(&self, text: DecodedText) {
        (self.on_text)(text.into_string());
    }

    fn fail(&self, error: &FileAcquisitionError) {
        match &self.on_error {
            Some(on_error) => on_error(error),
            None => {
                // The string export has no error channel; an empty string unblocks the host
                tracing::warn!("Delivering empty string after failure: {}", error);
                (self.on_text)(String::new());
            }
        }
    }
}

impl std::fmt::Debug for CallbackDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDelivery")
            .field("has_error_callback", &self.on_error.is_some())
            .finish()
    }
}

/// Delivery selected by [`DeliveryMode`].
#[derive(Debug)]
pub enum ConfiguredDelivery {
    ReturnValue(ReturnValueDelivery),
    Callback(CallbackDelivery),
}

impl ConfiguredDelivery {
    /// Build the delivery for `mode`. `callback` is only used by
    /// [`DeliveryMode::Callback`].
    pub fn new(mode: DeliveryMode, callback: impl Fn(String) + Send + Sync + 'static) -> Self {
        match mode {
            DeliveryMode::ReturnValue => Self::ReturnValue(ReturnValueDelivery::new()),
            DeliveryMode::Callback => Self::Callback(CallbackDelivery::new(callback)),
        }
    }

    /// Take the stored outcome of a return-value delivery.
    ///
    /// Always `None` for callback delivery, which has already pushed it.
    pub fn take_return_value(&self) -> Option<AcquisitionResult<DecodedText>> {
        match self {
            Self::ReturnValue(delivery) => delivery.take(),
            Self::Callback(_) => None,
        }
    }
}

impl TextDelivery for ConfiguredDelivery {
    fn deliver(&self, text: DecodedText) {
        match self {
            Self::ReturnValue(delivery) => delivery.deliver(text),
            Self::Callback(delivery) => delivery.deliver(text),
        }
    }

    fn fail(&self, error: &FileAcquisitionError) {
        match self {
            Self::ReturnValue(delivery) => delivery.fail(error),
            Self::Callback(delivery) => delivery.fail(error),
        }
    }
}
