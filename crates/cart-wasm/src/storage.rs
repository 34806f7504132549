//! # localStorage Snapshot Store
//!
//! Browser persistence for the cart: one JSON record under the storage key.

use cart_core::{CartError, CartResult, CartSnapshot, SnapshotStore, DEFAULT_STORAGE_KEY};
use wasm_bindgen::JsValue;
use web_sys::Storage;

const BACKEND: &str = "local_storage";

/// `window.localStorage` snapshot backend
#[derive(Debug, Clone)]
pub struct LocalStorageSnapshotStore {
    key: String,
}

impl LocalStorageSnapshotStore {
    /// Create a store for the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    fn local_storage(&self) -> CartResult<Storage> {
        let window = web_sys::window().ok_or_else(|| CartError::storage(BACKEND, "no window"))?;
        window
            .local_storage()
            .map_err(|e| CartError::storage(BACKEND, js_error_message(&e)))?
            .ok_or_else(|| CartError::storage(BACKEND, "localStorage unavailable"))
    }
}

impl Default for LocalStorageSnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl SnapshotStore for LocalStorageSnapshotStore {
    fn load(&self) -> CartResult<Option<CartSnapshot>> {
        let json = self
            .local_storage()?
            .get_item(&self.key)
            .map_err(|e| CartError::storage(BACKEND, js_error_message(&e)))?;

        match json {
            Some(json) => CartSnapshot::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
        let json = snapshot.to_json()?;
        // Quota errors land here
        self.local_storage()?
            .set_item(&self.key, &json)
            .map_err(|e| CartError::storage(BACKEND, js_error_message(&e)))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

/// Best-effort text for a thrown JS value
pub(crate) fn js_error_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
