//! Shared helpers for the browser tests.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventTarget, HtmlInputElement};

/// The picker's hidden input, if one is in the document.
pub(crate) fn file_input() -> Option<HtmlInputElement> {
    let document = web_sys::window().and_then(|w| w.document()).unwrap();
    document
        .query_selector("input[type=file]")
        .unwrap()
        .map(|element| element.unchecked_into())
}

/// Wait until the picker has inserted its input.
pub(crate) async fn inserted_input() -> HtmlInputElement {
    for _ in 0..100 {
        if let Some(input) = file_input() {
            return input;
        }
        let _ = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await;
    }
    panic!("no file input was inserted");
}

pub(crate) fn fire(target: &EventTarget, kind: &str) {
    target.dispatch_event(&Event::new(kind).unwrap()).unwrap();
}
