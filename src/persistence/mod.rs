//! Session save/load
//!
//! Features:
//! - Versioned JSON record, backward compatible with older pages
//! - One storage key per daily puzzle
//! - Corrupt records are discarded, never fatal

pub mod record;
pub mod store;

pub use record::{CURRENT_VERSION, PersistedAttempt, PersistedRecord};
pub use store::{KeyValueStore, MemoryStore, SessionStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("stored record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored record version {0} is newer than this build")]
    UnsupportedVersion(u32),
    #[error("storage unavailable: {0}")]
    Store(String),
}
