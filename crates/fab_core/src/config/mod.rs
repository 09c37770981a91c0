//! Bridge settings stored as TOML with `[bridge]`, `[dialog]` and
//! `[logging]` tables.
//!
//! The wasm build receives the same structure as JSON through `configure`
//! instead of reading a file.
//!
//! # Example
//!
//! ```no_run
//! use fab_core::config::{ConfigManager, ConfigSection};
//! use fab_core::models::DeliveryMode;
//!
//! let mut config = ConfigManager::new("bridge.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Entry point: {}", config.settings().bridge.entry_point);
//!
//! config.settings_mut().bridge.delivery = DeliveryMode::Callback;
//! config.update_section(ConfigSection::Bridge).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{BridgeSettings, ConfigSection, DialogSettings, LoggingSettings, Settings};
