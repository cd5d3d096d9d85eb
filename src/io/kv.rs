use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;

/// Error type for key-value backends
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// String-keyed persistent storage holding whole text values.
///
/// Writes replace the previous value unconditionally; there is no merge or
/// partial update.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;

    /// Directory for side files (recovery log), if the backend has one.
    fn data_dir(&self) -> Option<&Path> {
        None
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        (**self).set(key, value)
    }

    fn data_dir(&self) -> Option<&Path> {
        (**self).data_dir()
    }
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, KvError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            // Non-UTF-8 bytes are kept lossily so a corrupt payload still
            // reaches the recovery log
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Read { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| KvError::Write {
            path: self.dir.clone(),
            source: e,
        })?;
        atomic_write(&path, value.as_bytes()).map_err(|e| KvError::Write { path, source: e })
    }

    fn data_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

/// In-process map, used by tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirStore::new(tmp.path().join("data"));

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("data/k")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn dir_store_reads_non_utf8_lossily() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("k"), b"ab\xffcd").unwrap();
        let store = DirStore::new(tmp.path());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("ab\u{FFFD}cd"));
    }

    #[test]
    fn dir_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirStore::new(tmp.path());
        assert!(matches!(store.set("../x", "v"), Err(KvError::InvalidKey(_))));
        assert!(matches!(store.get("a/b"), Err(KvError::InvalidKey(_))));
        assert!(matches!(store.get(".recovery.log"), Err(KvError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(KvError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap(), None);
        assert!(store.data_dir().is_none());
    }
}
