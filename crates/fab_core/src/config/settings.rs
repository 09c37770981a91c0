//! Bridge settings, one struct per TOML table.
//!
//! Every field has a default, so a partial or empty file still loads.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{DecodeStrategy, DeliveryMode};
use crate::registration::OPEN_FILE_ENTRY;

/// The whole settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Host-facing bridge settings.
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// File dialog behaviour.
    #[serde(default)]
    pub dialog: DialogSettings,

    /// Log level and optional log file.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How the bridge talks to its host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Delivery convention for acquired text.
    #[serde(default)]
    pub delivery: DeliveryMode,

    /// How file bytes are turned into text.
    #[serde(default)]
    pub decode: DecodeStrategy,

    /// Name the entry point is installed under in the host's `env`.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Host function converting a string into a host object.
    #[serde(default = "default_conversion_fn")]
    pub conversion_fn: String,

    /// Host export receiving pushed strings (callback delivery).
    #[serde(default = "default_response_export")]
    pub response_export: String,
}

fn default_entry_point() -> String {
    OPEN_FILE_ENTRY.to_string()
}

fn default_conversion_fn() -> String {
    "js_object".to_string()
}

fn default_response_export() -> String {
    "string_response".to_string()
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            decode: DecodeStrategy::default(),
            entry_point: default_entry_point(),
            conversion_fn: default_conversion_fn(),
            response_export: default_response_export(),
        }
    }
}

/// File dialog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogSettings {
    /// Dialog title. Empty uses the platform default.
    #[serde(default)]
    pub title: String,

    /// Settle with `Cancelled` when the dialog closes without a file.
    ///
    /// When false, an empty selection leaves the acquisition pending until
    /// it is cancelled explicitly.
    #[serde(default = "default_true")]
    pub settle_on_cancel: bool,

    /// Browser only: how long to wait after the window regains focus before
    /// treating the dialog as dismissed.
    #[serde(default = "default_focus_grace_ms")]
    pub focus_grace_ms: u32,

    /// Cancel the selection after this many seconds. 0 disables the timeout.
    #[serde(default)]
    pub selection_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_focus_grace_ms() -> u32 {
    500
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            settle_on_cancel: true,
            focus_grace_ms: default_focus_grace_ms(),
            selection_timeout_secs: 0,
        }
    }
}

impl DialogSettings {
    /// Title to show, if one is configured.
    pub fn title(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }
}

/// `[logging]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write a daily log file (native only).
    #[serde(default)]
    pub log_to_file: bool,

    /// Where daily log files go when `log_to_file` is set.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_to_file: false,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Config sections for atomic updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Bridge,
    Dialog,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 3] = [
        ConfigSection::Bridge,
        ConfigSection::Dialog,
        ConfigSection::Logging,
    ];

    /// Table name in the settings file.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Bridge => "bridge",
            ConfigSection::Dialog => "dialog",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Bridge => "# Host bridge: delivery convention, decoding and host names",
            ConfigSection::Dialog => "# File dialog behaviour",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[bridge]"));
        assert!(toml.contains("[dialog]"));
        assert!(toml.contains("entry_point = \"open_file_js\""));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[bridge]\ndelivery = \"callback\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom value preserved
        assert_eq!(parsed.bridge.delivery, DeliveryMode::Callback);
        // Defaults applied for missing
        assert_eq!(parsed.bridge.decode, DecodeStrategy::Utf8Lossy);
        assert_eq!(parsed.bridge.response_export, "string_response");
        assert!(parsed.dialog.settle_on_cancel);
        assert_eq!(parsed.dialog.focus_grace_ms, 500);
    }

    #[test]
    fn blank_title_means_platform_default() {
        let mut dialog = DialogSettings::default();
        assert_eq!(dialog.title(), None);
        dialog.title = "  ".to_string();
        assert_eq!(dialog.title(), None);
        dialog.title = "Open level".to_string();
        assert_eq!(dialog.title(), Some("Open level"));
    }
}
