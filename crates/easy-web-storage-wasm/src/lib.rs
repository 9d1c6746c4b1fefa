#[cfg(target_arch = "wasm32")]
use lol_alloc::{FreeListAllocator, LockedAllocator};
mod area;
mod reporter;
mod utils;

use easy_web_storage::{ObserverHandle, StoreOptions, TypedStore};
use js_sys::{Function, Reflect, JSON};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

pub use area::{BrowserAreas, WebStorage};
pub use reporter::ConsoleReporter;

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: LockedAllocator<FreeListAllocator> = LockedAllocator::new(FreeListAllocator::new());

const INITIAL_VALUE_FIELD: &str = "initialValue";

#[wasm_bindgen(getter_with_clone)]
pub struct EasyWebStorageError {
    pub r#type: String,
    pub message: String,
}

enum BindingError {
    InvalidOptions(serde_wasm_bindgen::Error),
    ObserverLimit,
}

impl From<BindingError> for EasyWebStorageError {
    fn from(e: BindingError) -> EasyWebStorageError {
        match e {
            BindingError::InvalidOptions(e) => {
                EasyWebStorageError { r#type: "InvalidOptions".to_string(), message: e.to_string() }
            }
            BindingError::ObserverLimit => EasyWebStorageError {
                r#type: "ObserverLimit".to_string(),
                message: "no more observer handles are available".to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
struct JsStoreOptions {
    storage: String,
    key: String,
}

/// JS-facing store: `new EasyWebStorage({ storage: "localStorage", key: "user", initialValue })`.
#[wasm_bindgen]
pub struct EasyWebStorage {
    store: TypedStore<Value>,
    reporter: ConsoleReporter,
}

#[wasm_bindgen]
impl EasyWebStorage {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<EasyWebStorage, EasyWebStorageError> {
        utils::set_panic_hook();

        let JsStoreOptions { storage, key } =
            serde_wasm_bindgen::from_value(options.clone()).map_err(BindingError::InvalidOptions)?;
        let reporter = ConsoleReporter;
        let store = TypedStore::open(StoreOptions::new(storage, key).reporter(reporter), &BrowserAreas);

        let binding = EasyWebStorage { store, reporter };
        if !binding.store.is_inert() {
            let initial_value =
                Reflect::get(&options, &JsValue::from_str(INITIAL_VALUE_FIELD)).unwrap_or(JsValue::UNDEFINED);
            binding.seed(initial_value);
        }

        Ok(binding)
    }

    #[wasm_bindgen(getter)]
    pub fn key(&self) -> String {
        self.store.key().to_owned()
    }

    pub fn get(&self) -> JsValue {
        self.store.get().as_ref().map(to_js).unwrap_or(JsValue::NULL)
    }

    /// Encodes through `JSON.stringify`, so `toJSON` is honoured and `undefined` properties are dropped.
    /// `undefined` itself is stored as `null`.
    pub fn set(&self, value: JsValue) {
        match from_js(&value) {
            Ok(value) => self.store.set(&value),
            Err(e) => self.reporter.report_js("value is not JSON compatible", &e),
        }
    }

    pub fn remove(&self) {
        self.store.remove();
    }

    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, observer: Function) -> Result<u32, EasyWebStorageError> {
        let reporter = self.reporter;
        let handle = self.store.on_change(move |new_value, old_value| {
            let old_value = old_value.map(to_js).unwrap_or(JsValue::NULL);
            if let Err(e) = observer.call2(&JsValue::NULL, &to_js(new_value), &old_value) {
                reporter.report_js("change observer threw", &e);
            }
        });
        match js_handle(handle) {
            Some(handle) => Ok(handle),
            None => {
                self.store.off_change(handle);
                Err(BindingError::ObserverLimit.into())
            }
        }
    }

    #[wasm_bindgen(js_name = onRemove)]
    pub fn on_remove(&mut self, observer: Function) -> Result<u32, EasyWebStorageError> {
        let reporter = self.reporter;
        let handle = self.store.on_remove(move |key, old_value| {
            let old_value = old_value.map(to_js).unwrap_or(JsValue::NULL);
            if let Err(e) = observer.call2(&JsValue::NULL, &JsValue::from_str(key), &old_value) {
                reporter.report_js("remove observer threw", &e);
            }
        });
        match js_handle(handle) {
            Some(handle) => Ok(handle),
            None => {
                self.store.off_remove(handle);
                Err(BindingError::ObserverLimit.into())
            }
        }
    }

    #[wasm_bindgen(js_name = offChange)]
    pub fn off_change(&mut self, handle: u32) -> bool {
        self.store.off_change(ObserverHandle::from_id(handle.into()))
    }

    #[wasm_bindgen(js_name = offRemove)]
    pub fn off_remove(&mut self, handle: u32) -> bool {
        self.store.off_remove(ObserverHandle::from_id(handle.into()))
    }
}

impl EasyWebStorage {
    fn seed(&self, initial_value: JsValue) {
        if initial_value.is_null() || initial_value.is_undefined() {
            return;
        }

        let initial_value = match initial_value.dyn_ref::<Function>() {
            Some(factory) => match factory.call0(&JsValue::NULL) {
                Ok(value) => value,
                Err(e) => {
                    self.reporter.report_js(&format!("initial value for `{}` threw", self.store.key()), &e);
                    return;
                }
            },
            None => initial_value,
        };

        self.set(initial_value);
    }
}

/// Handles cross to JS as `u32`; ids beyond that range are refused rather than truncated.
fn js_handle(handle: ObserverHandle) -> Option<u32> {
    u32::try_from(handle.id()).ok()
}

fn to_js(value: &Value) -> JsValue {
    serde_json::to_string(value).ok().and_then(|text| JSON::parse(&text).ok()).unwrap_or(JsValue::NULL)
}

fn from_js(value: &JsValue) -> Result<Value, JsValue> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    // `JSON.stringify` yields `undefined` for functions and symbols.
    let Some(text) = JSON::stringify(value)?.as_string() else {
        return Ok(Value::Null);
    };
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}
