//! File acquisition: prompt for one file and hand its text to the host.
//!
//! # Architecture
//!
//! ```text
//! FileAcquisitionBridge
//!     ├── FilePicker       prompt, yields a FileSelection (or nothing)
//!     ├── decode           bytes -> UTF-8 string per DecodeStrategy
//!     └── TextDelivery     ReturnValueDelivery | CallbackDelivery
//! ```
//!
//! State runs `Idle -> WaitingForSelection -> Delivering -> Idle`. Every
//! acquisition settles: with text, with an error, or with `Cancelled` when
//! the prompt closes empty or a [`CancelHandle`] fires.
//!
//! # Example
//!
//! ```no_run
//! use fab_core::acquisition::{
//!     AcquireOptions, FileAcquisitionBridge, PresetPicker, ReturnValueDelivery,
//! };
//!
//! # async fn run() -> fab_core::acquisition::AcquisitionResult<()> {
//! let bridge = FileAcquisitionBridge::new(
//!     PresetPicker::single("notes.txt"),
//!     AcquireOptions::default(),
//! );
//! let delivery = ReturnValueDelivery::new();
//! bridge.acquire_and_deliver(&delivery).await?;
//! println!("{:?}", delivery.take());
//! # Ok(())
//! # }
//! ```

mod bridge;
mod cancel;
pub mod decode;
mod delivery;
mod errors;
#[cfg(not(target_arch = "wasm32"))]
mod local;
mod picker;
mod response;

pub use bridge::{AcquireOptions, FileAcquisitionBridge};
pub use cancel::CancelHandle;
pub use delivery::{
    CallbackDelivery, ConfiguredDelivery, ErrorCallback, ReturnValueDelivery, StringCallback,
    TextDelivery,
};
pub use errors::{AcquisitionResult, FileAcquisitionError};
#[cfg(not(target_arch = "wasm32"))]
pub use local::{PathSelection, PresetPicker};
pub use picker::{FilePicker, FileSelection, PickRequest};
pub use response::{PendingResponse, ResponseSlot, ResponseStatus};
