//! Platform bridge for fab_core
//!
//! - Native targets: [`RfdPicker`], an OS file dialog via `rfd`
//! - `wasm32`: a hidden `<input type="file">` picker and the plugin entry
//!   points (`init`, `register_plugin`, `configure`) a wasm host loads

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::{bridge_from_settings, open_file, RfdPicker};

/// Returns the bridge version string.
pub fn version() -> String {
    format!("{} (core {})", env!("CARGO_PKG_VERSION"), fab_core::version())
}
