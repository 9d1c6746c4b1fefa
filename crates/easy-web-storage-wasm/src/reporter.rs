use easy_web_storage::{Reporter, StoreError};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Writes reported failures to `console.error`.
#[derive(Clone, Copy, Default, Debug)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn report_js(&self, context: &str, error: &JsValue) {
        console::error_2(&JsValue::from_str(context), error);
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, error: &StoreError) {
        console::error_1(&JsValue::from_str(&error.to_string()));
    }
}
