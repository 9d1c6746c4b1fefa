use easy_web_storage::{AreaError, AreaKind, AreaResolver, StorageArea};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

const QUOTA_EXCEEDED: &str = "QuotaExceededError";

/// `window.localStorage` or `window.sessionStorage`.
pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    pub fn new(storage: Storage) -> Self {
        WebStorage { storage }
    }
}

impl StorageArea for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AreaError> {
        self.storage.get_item(key).map_err(|e| host_error(key, e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AreaError> {
        self.storage.set_item(key, value).map_err(|e| host_error(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), AreaError> {
        self.storage.remove_item(key).map_err(|e| host_error(key, e))
    }
}

fn host_error(key: &str, error: JsValue) -> AreaError {
    match error.dyn_ref::<DomException>() {
        Some(exception) if exception.name() == QUOTA_EXCEEDED => AreaError::QuotaExceeded { key: key.to_owned() },
        Some(exception) => AreaError::Host(format!("{}: {}", exception.name(), exception.message())),
        None => AreaError::Host(format!("{error:?}")),
    }
}

/// Resolves area kinds against the page's global `window`.
#[derive(Clone, Copy, Default, Debug)]
pub struct BrowserAreas;

impl AreaResolver for BrowserAreas {
    fn resolve(&self, kind: AreaKind) -> Result<Box<dyn StorageArea>, AreaError> {
        let window = web_sys::window().ok_or_else(|| AreaError::Unavailable("no global window".to_owned()))?;

        // Accessing storage throws a SecurityError when the host blocks it.
        let storage = match kind {
            AreaKind::Local => window.local_storage(),
            AreaKind::Session => window.session_storage(),
        }
        .map_err(|e| match host_error("", e) {
            AreaError::Host(message) => AreaError::Unavailable(message),
            other => other,
        })?
        .ok_or_else(|| AreaError::Unavailable(format!("{kind} storage is not provided by the host")))?;

        Ok(Box::new(WebStorage::new(storage)))
    }
}
