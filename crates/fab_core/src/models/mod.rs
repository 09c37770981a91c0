//! Data models for the file acquisition bridge.
//!
//! - Enums for delivery conventions, decode strategies and bridge state
//! - The decoded text handed to the host

mod enums;
mod text;

pub use enums::{BridgeState, DecodeStrategy, DeliveryMode};
pub use text::DecodedText;
