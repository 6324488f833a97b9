//! Key-value storage and the session save/load adapter

use std::collections::HashMap;

use super::PersistenceError;
use super::record::PersistedRecord;
use crate::game::SessionSnapshot;

/// String key-value storage (LocalStorage on the web)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set_item(key, value)
    }
}

/// In-process store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Saves and restores sessions, one key per puzzle
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Storage key for a puzzle; depends on nothing but the identity
    pub fn key_for(&self, puzzle_id: &str) -> String {
        format!("{}:{}", self.prefix, puzzle_id)
    }

    /// Write the snapshot under its puzzle's key (last writer wins)
    pub fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&PersistedRecord::from_snapshot(snapshot))?;
        self.store.set_item(&self.key_for(&snapshot.puzzle_id), &json)?;
        log::info!(
            "Session saved ({}, attempt {})",
            snapshot.puzzle_id,
            snapshot.attempt_count
        );
        Ok(())
    }

    /// Read the stored session for a puzzle.
    ///
    /// Missing, unreadable or unsupported records all come back as `None` so
    /// the caller starts fresh.
    pub fn load(&self, puzzle_id: &str, max_attempts: u32) -> Option<SessionSnapshot> {
        match self.try_load(puzzle_id, max_attempts) {
            Ok(Some(snapshot)) => {
                log::info!(
                    "Restored session {} ({} attempts)",
                    puzzle_id,
                    snapshot.history.len()
                );
                Some(snapshot)
            }
            Ok(None) => {
                log::info!("No saved session for {puzzle_id}, starting fresh");
                None
            }
            Err(err) => {
                log::warn!("Discarding saved session for {puzzle_id}: {err}");
                None
            }
        }
    }

    fn try_load(
        &self,
        puzzle_id: &str,
        max_attempts: u32,
    ) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let Some(json) = self.store.get_item(&self.key_for(puzzle_id))? else {
            return Ok(None);
        };
        let record: PersistedRecord = serde_json::from_str(&json)?;
        record.into_snapshot(puzzle_id, max_attempts).map(Some)
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
