//! Browser `localStorage` backend for the session store.

use fc_editor::{Store, StoreError};
use wasm_bindgen::JsValue;

/// Saves the scene under one `localStorage` key.
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Store for LocalStorage {
    fn load(&self) -> Result<Option<String>, StoreError> {
        storage()?.get_item(&self.key).map_err(unavailable)
    }

    fn save(&mut self, json: &str) -> Result<(), StoreError> {
        storage()?.set_item(&self.key, json).map_err(unavailable)
    }
}

fn storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
        .local_storage()
        .map_err(unavailable)?
        .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
}

/// Quota and security errors arrive as opaque JS values.
fn unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
