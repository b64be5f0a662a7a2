//! Key-value persistence with JSON records
//!
//! Features:
//! - `Store` trait over raw string records
//! - JSON file store (one file per key) and an in-memory store
//! - Typed load that falls back to the record's default on any failure

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// High-score list record
pub const SCORES_KEY: &str = "scores";
/// Player economy record
pub const ECONOMY_KEY: &str = "economy";
/// User preferences record
pub const SETTINGS_KEY: &str = "settings";

/// Persistence failures
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid key {0:?}")]
    InvalidKey(String),

    #[error("Serialization error for {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw record storage
pub trait Store {
    /// Read a record, `Ok(None)` when it does not exist
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Write a record, replacing any previous value
    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistError>;
}

/// Load and decode a record, falling back to `T::default()` when the record
/// is missing, unreadable or malformed
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    match store.load(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Malformed {key} record, using defaults: {e}");
                T::default()
            }
        },
        Ok(None) => {
            log::info!("No {key} record found, starting fresh");
            T::default()
        }
        Err(e) => {
            log::warn!("Could not read {key} record, using defaults: {e}");
            T::default()
        }
    }
}

/// Encode and write a record
pub fn save_record<T, S>(store: &mut S, key: &str, record: &T) -> Result<(), PersistError>
where
    T: Serialize,
    S: Store + ?Sized,
{
    let json = serde_json::to_string_pretty(record).map_err(|source| PersistError::Json {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &json)
}

/// Keys become file names, so only a conservative alphabet is accepted
pub(crate) fn validate_key(key: &str) -> Result<(), PersistError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PersistError::InvalidKey(key.to_string()))
    }
}
