//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a sibling temp file that
//! is renamed over the target, so readers never observe a partial value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let usable = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !usable {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| io_error(&self.dir, err))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|err| io_error(&tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| io_error(&path, err))?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote storage item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_item_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get_item("yeelight").unwrap(), None);
    }

    #[test]
    fn set_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested"));
        store.set_item("yeelight", "[]").unwrap();
        store.set_item("yeelight", "[1]").unwrap();
        assert_eq!(store.get_item("yeelight").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("nested/yeelight.json.tmp").exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set_item("yeelight", "[]").unwrap();
        store.remove_item("yeelight").unwrap();
        store.remove_item("yeelight").unwrap();
        assert_eq!(store.get_item("yeelight").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert!(matches!(
            store.get_item("../escape"),
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.set_item("", "[]"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
