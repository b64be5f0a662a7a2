//! JSON files in a data directory, one `<key>.json` per record

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistError, Store, validate_key};

/// File-backed store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Store for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }

    /// Writes go to a temporary file first and are renamed into place, so a
    /// crash mid-write leaves the previous record intact
    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistError::Io { path, source })?;
        log::debug!("Saved {key} record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("scores").unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested"));
        store.save("scores", "[3, 2, 1]").unwrap();
        assert_eq!(store.load("scores").unwrap().as_deref(), Some("[3, 2, 1]"));
        assert!(dir.path().join("nested").join("scores.json").exists());
        assert!(!dir.path().join("nested").join("scores.json.tmp").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.save("../escape", "{}"),
            Err(PersistError::InvalidKey(_))
        ));
    }
}
