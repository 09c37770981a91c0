//! Functions the wasm host exposes to plugins.
//!
//! The host's JS loader provides a conversion function (`js_object`) that
//! turns a JS string into an object its compiled code can hold, and exposes
//! the module's exports as `wasm_exports`. Names come from `[bridge]`.

use fab_core::config::BridgeSettings;
use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Global under which the host exposes the module exports.
const WASM_EXPORTS_GLOBAL: &str = "wasm_exports";

/// Looks up and calls host functions by their configured names.
#[derive(Debug, Clone)]
pub struct HostFunctions {
    conversion_fn: String,
    response_export: String,
}

impl HostFunctions {
    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self {
            conversion_fn: settings.conversion_fn.clone(),
            response_export: settings.response_export.clone(),
        }
    }

    /// Convert `text` with the host's conversion function.
    pub fn to_host_object(&self, text: &str) -> Result<JsValue, JsValue> {
        let global = js_sys::global();
        let convert = function_at(&global, &self.conversion_fn)?;
        convert.call1(&JsValue::NULL, &JsValue::from_str(text))
    }

    /// Convert `text` and push it into the host's response export.
    pub fn push_response(&self, text: &str) -> Result<(), JsValue> {
        let object = self.to_host_object(text)?;
        let exports = Reflect::get(&js_sys::global(), &JsValue::from_str(WASM_EXPORTS_GLOBAL))?;
        if exports.is_undefined() {
            return Err(JsValue::from_str("host has no wasm_exports"));
        }
        let respond = function_at(&exports, &self.response_export)?;
        respond.call1(&exports, &object)?;
        Ok(())
    }
}

fn function_at(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("host function '{}' is missing", name)))
}
