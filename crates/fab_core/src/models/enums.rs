//! Core enums used throughout the bridge.

use serde::{Deserialize, Serialize};

/// How decoded text is handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// The entry point returns the text, converted by the host's `js_object`.
    #[default]
    ReturnValue,
    /// The bridge pushes the text into the host's `string_response` export.
    Callback,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::ReturnValue => write!(f, "return_value"),
            DeliveryMode::Callback => write!(f, "callback"),
        }
    }
}

/// How the selected file's bytes become a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    /// Read raw bytes and decode, substituting U+FFFD for invalid sequences.
    #[default]
    Utf8Lossy,
    /// Read raw bytes and reject anything that is not valid UTF-8.
    Utf8Strict,
    /// Let the platform read the file as text.
    NativeText,
}

impl std::fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeStrategy::Utf8Lossy => write!(f, "utf8_lossy"),
            DecodeStrategy::Utf8Strict => write!(f, "utf8_strict"),
            DecodeStrategy::NativeText => write!(f, "native_text"),
        }
    }
}

/// Lifecycle of a single acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    #[default]
    Idle,
    /// The picker is open and no file has been chosen yet.
    WaitingForSelection,
    /// A file was chosen; reading, decoding and handing it over.
    Delivering,
}

impl std::fmt::Display for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeState::Idle => write!(f, "idle"),
            BridgeState::WaitingForSelection => write!(f, "waiting for selection"),
            BridgeState::Delivering => write!(f, "delivering"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        delivery: DeliveryMode,
        decode: DecodeStrategy,
    }

    #[test]
    fn enums_use_snake_case_names() {
        let parsed: Wrapper =
            toml::from_str("delivery = \"callback\"\ndecode = \"native_text\"").unwrap();
        assert_eq!(parsed.delivery, DeliveryMode::Callback);
        assert_eq!(parsed.decode, DecodeStrategy::NativeText);
        assert_eq!(parsed.decode.to_string(), "native_text");
    }
}
