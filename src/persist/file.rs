//! JSON file-backed store with atomic writes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::persist::KeyValueStore;

type Document = BTreeMap<String, BTreeMap<String, Value>>;

/// File-backed store. All namespaces live in one JSON object:
/// `{ "<namespace>": { "<key>": <value>, ... }, ... }`.
///
/// The document is held in memory and rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file doesn't exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|e| storage_error(&path, e))?;
            if data.trim().is_empty() {
                Document::new()
            } else {
                serde_json::from_str(&data).map_err(|e| storage_error(&path, e))?
            }
        } else {
            Document::new()
        };

        debug!(path = %path.display(), namespaces = document.len(), "opened json store");

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: write to temp, rename over target.
    fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| storage_error(&self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        Ok(document
            .get(namespace)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        let mut document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        document
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.write_document(&document)
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        let mut document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        let removed = document
            .get_mut(namespace)
            .and_then(|values| values.remove(key))
            .is_some();
        if !removed {
            return Ok(());
        }
        if document.get(namespace).is_some_and(|values| values.is_empty()) {
            document.remove(namespace);
        }
        self.write_document(&document)
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> BridgeError {
    BridgeError::Storage(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();

        assert_eq!(store.get("troet", "keylist").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("troet", "keylist", json!(["AAAA", "BBBB"])).unwrap();
            store.set("troet", "AAAA", json!("https://a")).unwrap();
            store.set("troet", "BBBB", json!("https://b")).unwrap();
            store.delete("troet", "BBBB").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            store.get("troet", "keylist").unwrap(),
            Some(json!(["AAAA", "BBBB"]))
        );
        assert_eq!(store.get("troet", "AAAA").unwrap(), Some(json!("https://a")));
        assert_eq!(store.get("troet", "BBBB").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("troet", "AAAA", json!("https://a")).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(BridgeError::Storage(_))));
    }
}
