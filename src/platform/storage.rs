//! LocalStorage-backed key-value store

use crate::persistence::{KeyValueStore, PersistenceError};

/// The window's LocalStorage
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// None when storage is disabled (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Store(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Store(format!("{e:?}")))
    }
}
