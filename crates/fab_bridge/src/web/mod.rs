//! Browser side of the bridge.
//!
//! Load order on the host page:
//!
//! ```text
//! host loader (gl.js)  ->  wasm module  ->  init()
//!                                            └── miniquad_add_plugin({ register_plugin })
//!                                                  └── env.open_file_js = <entry point>
//! ```

mod console;
mod host;
mod picker;
mod plugin;
#[cfg(test)]
mod testing;

pub use console::{ConsoleMakeWriter, ConsoleWriter};
pub use host::HostFunctions;
pub use picker::{HiddenInputPicker, WebFileSelection};
pub use plugin::{configure, init, register_plugin};
