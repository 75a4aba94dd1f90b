//! Persistence adapters for UI preferences and form drafts.
//!
//! Components never touch `localStorage` directly; they are handed a
//! [`KeyValueStore`] and call it explicitly. The browser implementation is
//! best-effort: a missing or disabled storage reads as empty and writes are
//! dropped with a warning. [`MemoryStore`] backs the host-side unit tests.

use crate::error::UiError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use web_sys::Storage;

/// String-keyed, string-valued store scoped to the browsing origin.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<Storage, UiError> {
        let window = web_sys::window().ok_or(UiError::StorageUnavailable)?;
        window.local_storage()?.ok_or(UiError::StorageUnavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let result = Self::storage().and_then(|s| s.set_item(key, value).map_err(UiError::from));
        if let Err(e) = result {
            warn!("Could not persist {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        let result = Self::storage().and_then(|s| s.remove_item(key).map_err(UiError::from));
        if let Err(e) = result {
            warn!("Could not clear {}: {}", key, e);
        }
    }
}

/// In-process store, used where no browser is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Load a JSON value for `key`; absent or unparsable data reads as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed {} state: {}", key, e);
            None
        }
    }
}

/// Save a JSON value for `key`.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), UiError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw);
    Ok(())
}
