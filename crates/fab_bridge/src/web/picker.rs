//! Browser file picker built on a hidden `<input type="file">`.
//!
//! Browsers do not report a dismissed file dialog reliably. The picker
//! settles on whichever comes first:
//! - `change` on the input (a file, or an empty list)
//! - `cancel` on the input, where supported
//! - the window regaining focus with still no file after a grace period

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fab_core::acquisition::{
    AcquisitionResult, FileAcquisitionError, FilePicker, FileSelection, PickRequest,
};
use js_sys::{Function, Uint8Array};
use tokio::sync::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, HtmlInputElement, Window};

type Settle = Rc<RefCell<Option<oneshot::Sender<Option<File>>>>>;

/// Picker that inserts one invisible input control per prompt.
#[derive(Debug, Clone, Copy)]
pub struct HiddenInputPicker {
    focus_grace_ms: u32,
}

impl HiddenInputPicker {
    pub fn new(focus_grace_ms: u32) -> Self {
        Self { focus_grace_ms }
    }

    async fn prompt(&self) -> Result<Option<File>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_type("file");
        input.set_multiple(false);
        input.style().set_property("display", "none")?;
        body.append_child(&input)?;
        let control = HiddenControl {
            input: input.clone(),
        };

        let (tx, rx) = oneshot::channel();
        let settle: Settle = Rc::new(RefCell::new(Some(tx)));
        let listeners = Listeners::attach(&window, &input, &settle, self.focus_grace_ms)?;

        input.click();
        let file = rx.await.ok().flatten();

        drop(listeners);
        drop(control);
        Ok(file)
    }
}

impl FilePicker for HiddenInputPicker {
    type Selection = WebFileSelection;

    async fn pick(&self, request: &PickRequest) -> Option<WebFileSelection> {
        if let Some(title) = &request.title {
            tracing::debug!("Browser file inputs have no title; ignoring {:?}", title);
        }
        match self.prompt().await {
            Ok(file) => file.map(WebFileSelection::new),
            Err(e) => {
                tracing::error!("File prompt failed: {}", describe(&e));
                None
            }
        }
    }
}

fn settle_with(settle: &Settle, file: Option<File>) {
    if let Some(tx) = settle.borrow_mut().take() {
        let _ = tx.send(file);
    }
}

/// The inserted input; removed from the document when dropped.
struct HiddenControl {
    input: HtmlInputElement,
}

impl Drop for HiddenControl {
    fn drop(&mut self) {
        self.input.remove();
    }
}

/// Event handlers of one prompt; detached when dropped.
struct Listeners {
    window: Window,
    on_focus: Closure<dyn FnMut(Event)>,
    // Kept alive until drop: the input holds references to them
    _on_change: Closure<dyn FnMut(Event)>,
    _on_cancel: Closure<dyn FnMut(Event)>,
    _on_grace_elapsed: Closure<dyn FnMut()>,
    timer: Rc<Cell<Option<i32>>>,
}

impl Listeners {
    fn attach(
        window: &Window,
        input: &HtmlInputElement,
        settle: &Settle,
        focus_grace_ms: u32,
    ) -> Result<Self, JsValue> {
        let on_change = {
            let settle = Rc::clone(settle);
            let input = input.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                let file = input.files().and_then(|files| files.get(0));
                if file.is_none() {
                    tracing::debug!("File input changed with no files");
                }
                settle_with(&settle, file);
            })
        };
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;

        let on_cancel = {
            let settle = Rc::clone(settle);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                tracing::debug!("File dialog cancelled");
                settle_with(&settle, None);
            })
        };
        input.add_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref())?;

        let timer = Rc::new(Cell::new(None));
        let on_grace_elapsed = {
            let settle = Rc::clone(settle);
            let input = input.clone();
            let timer = Rc::clone(&timer);
            Closure::<dyn FnMut()>::new(move || {
                timer.set(None);
                let empty = input.files().map_or(true, |files| files.length() == 0);
                if empty {
                    tracing::debug!("Window refocused without a file; dialog dismissed");
                    settle_with(&settle, None);
                }
            })
        };

        let on_focus = {
            let window = window.clone();
            let timer = Rc::clone(&timer);
            let callback = on_grace_elapsed.as_ref().unchecked_ref::<Function>().clone();
            let grace = i32::try_from(focus_grace_ms).unwrap_or(i32::MAX);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                if let Some(previous) = timer.take() {
                    window.clear_timeout_with_handle(previous);
                }
                match window.set_timeout_with_callback_and_timeout_and_arguments_0(&callback, grace)
                {
                    Ok(id) => timer.set(Some(id)),
                    Err(e) => {
                        tracing::warn!("Could not schedule dismissal check: {}", describe(&e))
                    }
                }
            })
        };
        window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())?;

        Ok(Self {
            window: window.clone(),
            on_focus,
            _on_change: on_change,
            _on_cancel: on_cancel,
            _on_grace_elapsed: on_grace_elapsed,
            timer,
        })
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
        let _ = self
            .window
            .remove_event_listener_with_callback("focus", self.on_focus.as_ref().unchecked_ref());
    }
}

/// A file chosen through the browser dialog.
#[derive(Debug, Clone)]
pub struct WebFileSelection {
    file: File,
}

impl WebFileSelection {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl FileSelection for WebFileSelection {
    fn name(&self) -> String {
        self.file.name()
    }

    async fn size(&self) -> AcquisitionResult<usize> {
        Ok(self.file.size() as usize)
    }

    async fn read_bytes(&self) -> AcquisitionResult<Vec<u8>> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| FileAcquisitionError::read_failed(self.name(), describe(&e)))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }

    async fn read_text(&self) -> AcquisitionResult<String> {
        let text = JsFuture::from(self.file.text())
            .await
            .map_err(|e| FileAcquisitionError::read_failed(self.name(), describe(&e)))?;
        text.as_string().ok_or_else(|| {
            FileAcquisitionError::read_failed(self.name(), "Blob.text() did not yield a string")
        })
    }
}

/// Human-readable form of a JS exception value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
