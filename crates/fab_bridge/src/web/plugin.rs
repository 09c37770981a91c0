//! Plugin entry points exported to the host page.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use fab_core::acquisition::{
    AcquireOptions, ConfiguredDelivery, FileAcquisitionBridge, FileAcquisitionError,
};
use fab_core::config::Settings;
use fab_core::models::BridgeState;
use fab_core::logging::init_tracing_with_writer;
use fab_core::registration::{ImportObject, PluginRegistration, RegistrationError};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;

use super::console::ConsoleMakeWriter;
use super::host::HostFunctions;
use super::picker::{describe, HiddenInputPicker};

static PLUGIN: PluginRegistration = PluginRegistration::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

type WebBridge = FileAcquisitionBridge<HiddenInputPicker>;

thread_local! {
    static SETTINGS: RefCell<Settings> = RefCell::new(Settings::default());
    static BRIDGE: RefCell<Option<Rc<WebBridge>>> = const { RefCell::new(None) };
}

fn build_bridge(settings: &Settings) -> Rc<WebBridge> {
    Rc::new(FileAcquisitionBridge::new(
        HiddenInputPicker::new(settings.dialog.focus_grace_ms),
        AcquireOptions::from_settings(&settings.bridge, &settings.dialog),
    ))
}

/// Replace the bridge settings with a JSON document of the TOML layout.
///
/// Missing keys keep their defaults. Applies to later file requests and is
/// refused while a file request is pending.
#[wasm_bindgen]
pub fn configure(settings_json: &str) -> Result<(), JsValue> {
    let settings: Settings = serde_json::from_str(settings_json)
        .map_err(|e| JsValue::from_str(&format!("invalid bridge settings: {}", e)))?;

    BRIDGE.with(|bridge| {
        let mut bridge = bridge.borrow_mut();
        if let Some(current) = bridge.as_ref() {
            let state = current.state();
            if state != BridgeState::Idle {
                tracing::warn!("Refusing new settings while {}", state);
                return Err(to_js_error(&FileAcquisitionError::Busy));
            }
            *bridge = Some(build_bridge(&settings));
        }
        Ok(())
    })?;
    SETTINGS.with(|current| *current.borrow_mut() = settings);
    tracing::info!("Bridge settings updated");
    Ok(())
}

/// Explicit bootstrap: set up console logging and hand the plugin to the
/// host loader. Safe to call more than once.
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    let level = SETTINGS.with(|settings| settings.borrow().logging.level);
    init_tracing_with_writer(level, ConsoleMakeWriter);

    let result = add_to_host_loader();
    if result.is_err() {
        INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

fn add_to_host_loader() -> Result<(), JsValue> {
    let global = js_sys::global();
    let add_plugin = Reflect::get(&global, &JsValue::from_str("miniquad_add_plugin"))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str("host loader has no miniquad_add_plugin"))?;

    let register = Closure::<dyn Fn(JsValue)>::new(|import_object: JsValue| {
        if let Err(e) = register_plugin(import_object) {
            tracing::error!("Plugin registration failed: {}", describe(&e));
        }
    });

    let plugin = Object::new();
    Reflect::set(&plugin, &"name".into(), &"fab_bridge".into())?;
    Reflect::set(&plugin, &"version".into(), &env!("CARGO_PKG_VERSION").into())?;
    Reflect::set(&plugin, &"register_plugin".into(), &register.into_js_value())?;

    add_plugin.call1(&JsValue::NULL, &plugin)?;
    tracing::info!("Handed plugin to host loader");
    Ok(())
}

/// Install the file entry point into the host's import object.
///
/// Only the first call installs anything.
#[wasm_bindgen]
pub fn register_plugin(import_object: JsValue) -> Result<(), JsValue> {
    let entry_point = SETTINGS.with(|settings| {
        let settings = settings.borrow();
        BRIDGE.with(|bridge| {
            bridge
                .borrow_mut()
                .get_or_insert_with(|| build_bridge(&settings));
        });
        settings.bridge.entry_point.clone()
    });

    let entry = Closure::<dyn Fn() -> Promise>::new(open_file)
        .into_js_value()
        .unchecked_into::<Function>();

    let mut imports = JsImports {
        object: import_object,
    };
    PLUGIN
        .register(&mut imports, &entry_point, entry)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The host-callable entry point.
///
/// Resolves with the converted text (return-value delivery) or with
/// `undefined` after pushing it into the response export (callback
/// delivery). Failures reject with an `Error` whose `name` is the error kind;
/// a request made while another is pending always rejects with `Busy`.
fn open_file() -> Promise {
    let bridge = BRIDGE.with(|bridge| bridge.borrow().clone());
    let bridge_settings = SETTINGS.with(|settings| settings.borrow().bridge.clone());

    future_to_promise(async move {
        let bridge = bridge.ok_or_else(|| JsValue::from_str("file bridge is not registered"))?;
        let host = HostFunctions::from_settings(&bridge_settings);

        let push_host = host.clone();
        let delivery = ConfiguredDelivery::new(bridge_settings.delivery, move |text| {
            if let Err(e) = push_host.push_response(&text) {
                tracing::error!("Could not push response to host: {}", describe(&e));
            }
        });

        bridge
            .acquire_and_deliver(&delivery)
            .await
            .map_err(|e| to_js_error(&e))?;

        match delivery.take_return_value() {
            Some(Ok(text)) => host.to_host_object(text.as_str()),
            Some(Err(e)) => Err(to_js_error(&e)),
            None => Ok(JsValue::UNDEFINED),
        }
    })
}

fn to_js_error(error: &FileAcquisitionError) -> JsValue {
    let js_error = js_sys::Error::new(&error.to_string());
    let kind = match error {
        FileAcquisitionError::Cancelled => "Cancelled",
        FileAcquisitionError::ReadFailed { .. } => "ReadFailed",
        FileAcquisitionError::DecodeFailed { .. } => "DecodeFailed",
        FileAcquisitionError::Busy => "Busy",
    };
    js_error.set_name(kind);
    js_error.into()
}

/// The host's import object.
struct JsImports {
    object: JsValue,
}

impl ImportObject for JsImports {
    type Entry = Function;

    fn install(
        &mut self,
        namespace: &str,
        name: &str,
        entry: Function,
    ) -> Result<(), RegistrationError> {
        let table = Reflect::get(&self.object, &JsValue::from_str(namespace))
            .ok()
            .filter(|value| value.is_object())
            .ok_or_else(|| RegistrationError::MissingNamespace(namespace.to_string()))?;

        Reflect::set(&table, &JsValue::from_str(name), &entry)
            .map_err(|e| RegistrationError::HostRejected {
                name: name.to_string(),
                message: describe(&e),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{fire, inserted_input};
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn import_object(with_env: bool) -> Object {
        let imports = Object::new();
        if with_env {
            Reflect::set(&imports, &"env".into(), &Object::new()).unwrap();
        }
        imports
    }

    fn installed_entry(imports: &Object) -> JsValue {
        let env = Reflect::get(imports, &"env".into()).unwrap();
        Reflect::get(&env, &"open_file_js".into()).unwrap()
    }

    fn install_fresh_bridge() -> Rc<WebBridge> {
        let bridge = build_bridge(&Settings::default());
        BRIDGE.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&bridge)));
        bridge
    }

    fn error_name(value: JsValue) -> String {
        String::from(value.unchecked_into::<js_sys::Error>().name())
    }

    #[wasm_bindgen_test]
    fn entry_point_is_installed_once() {
        assert!(register_plugin(import_object(false).into()).is_err());
        assert!(!PLUGIN.is_registered());

        let first = import_object(true);
        register_plugin(first.clone().into()).unwrap();
        assert!(installed_entry(&first).is_function());

        let second = import_object(true);
        register_plugin(second.clone().into()).unwrap();
        assert!(installed_entry(&second).is_undefined());
    }

    #[wasm_bindgen_test]
    fn errors_carry_their_kind_as_name() {
        assert_eq!(error_name(to_js_error(&FileAcquisitionError::Busy)), "Busy");
        assert_eq!(
            error_name(to_js_error(&FileAcquisitionError::Cancelled)),
            "Cancelled"
        );
        assert_eq!(
            error_name(to_js_error(&FileAcquisitionError::decode_failed("a", 0))),
            "DecodeFailed"
        );
    }

    #[wasm_bindgen_test]
    async fn second_request_rejects_busy_and_first_settles_on_cancel() {
        install_fresh_bridge();

        let first = JsFuture::from(open_file());
        let second = JsFuture::from(open_file());

        let busy = second.await.unwrap_err();
        assert_eq!(error_name(busy), "Busy");

        fire(&inserted_input().await, "cancel");
        let cancelled = first.await.unwrap_err();
        assert_eq!(error_name(cancelled), "Cancelled");
    }

    #[wasm_bindgen_test]
    async fn configure_is_refused_while_a_request_is_pending() {
        let bridge = install_fresh_bridge();

        let (outcome, ()) = tokio::join!(bridge.acquire(), async {
            let input = inserted_input().await;
            assert!(configure("{}").is_err());
            fire(&input, "cancel");
        });
        assert_eq!(outcome, Err(FileAcquisitionError::Cancelled));

        configure(r#"{"dialog": {"focus_grace_ms": 250}}"#).unwrap();
        let rebuilt = BRIDGE.with(|slot| slot.borrow().clone()).unwrap();
        assert!(!Rc::ptr_eq(&rebuilt, &bridge));
    }
}
