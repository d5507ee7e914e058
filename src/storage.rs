use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read storage file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write storage file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file {path} is not a JSON object of string values")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value storage.
///
/// Mirrors the browser `localStorage` contract: whole values are read and
/// replaced, there are no transactions and no expiry.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and as a scratch backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a single entry
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.into());
        Self { entries }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage backed by one JSON object file on disk.
///
/// The file maps keys to string values. It is read in full on every `get`
/// and rewritten in full on every `set`; a missing file holds no keys.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        // A map of strings always serializes
        let json = Value::from(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<serde_json::Map<_, _>>(),
        );

        fs::write(&self.path, format!("{:#}\n", json)).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)?;
        debug!("Wrote key '{}' to {}", key, self.path.display());
        Ok(())
    }
}

/// Storage that serves fixed entries and refuses every write
#[cfg(test)]
pub(crate) struct ReadOnlyStorage {
    inner: MemoryStorage,
}

#[cfg(test)]
impl ReadOnlyStorage {
    pub(crate) fn with_entry(key: &str, value: impl Into<String>) -> Self {
        Self {
            inner: MemoryStorage::with_entry(key, value),
        }
    }
}

#[cfg(test)]
impl KeyValueStorage for ReadOnlyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Write {
            path: PathBuf::from("read-only"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only storage"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== MemoryStorage Tests ====================

    #[test]
    fn test_memory_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[test]
    fn test_memory_set_then_get() {
        let mut storage = MemoryStorage::new();
        storage.set("key", "value".to_string()).unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_memory_set_overwrites() {
        let mut storage = MemoryStorage::with_entry("key", "old");
        storage.set("key", "new".to_string()).unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("new"));
    }

    // ==================== FileStorage Tests ====================

    #[test]
    fn test_file_missing_reads_as_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(temp_dir.path().join("absent.json"));
        assert_eq!(storage.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_set_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("dir").join("store.json");
        let mut storage = FileStorage::new(&path);

        storage.set("key", "value".to_string()).unwrap();

        assert!(path.exists());
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_keeps_other_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(temp_dir.path().join("store.json"));

        storage.set("a", "1".to_string()).unwrap();
        storage.set("b", "2".to_string()).unwrap();
        storage.set("a", "3".to_string()).unwrap();

        assert_eq!(storage.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_persists_across_instances() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");

        {
            let mut storage = FileStorage::new(&path);
            storage.set("key", "[1,2,3]".to_string()).unwrap();
        }

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_file_empty_content_reads_as_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "  \n").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("key").unwrap(), None);
    }

    #[test]
    fn test_file_corrupt_content_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        let result = storage.get("key");
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_file_non_string_values_are_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        fs::write(&path, r#"{"key": 42}"#).unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get("key").is_err());
    }
}
