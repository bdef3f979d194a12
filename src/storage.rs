//! Key/value string storage shared by the content modules.
//!
//! Values live in memory and, unless the store is ephemeral, are mirrored to
//! a single JSON object file. Reads never fail: a missing or corrupt file is
//! treated as an empty store. Write failures are logged and the in-memory
//! value is kept.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DeskError, Result};

pub const STORAGE_FILE: &str = "storage.json";
const APP_DIR: &str = "term-desk";

#[derive(Debug, Default)]
struct Inner {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

/// Cheap to clone; clones share the same underlying store.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    inner: Arc<Mutex<Inner>>,
}

impl Storage {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or create) the store in `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORAGE_FILE);
        if path.exists() && !path.is_file() {
            return Err(DeskError::StoragePath(path));
        }
        let values = load(&path);
        debug!(path = %path.display(), keys = values.len(), "opened storage");
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                values,
                path: Some(path),
            })),
        })
    }

    /// Open the store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dir = default_data_dir().ok_or(DeskError::NoDataDir)?;
        Self::open(dir)
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value.into());
        persist(&inner);
    }

    /// Store `value` only when `key` has no value yet. Returns whether it was
    /// written.
    pub fn init_if_absent(&self, key: &str, value: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if inner.values.contains_key(key) {
            return false;
        }
        inner.values.insert(key.to_string(), value.into());
        persist(&inner);
        true
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let mut inner = self.lock();
        let removed = inner.values.remove(key);
        if removed.is_some() {
            persist(&inner);
        }
        removed
    }

    /// Decode a JSON value. Missing keys and unparsable values both yield
    /// `None`; the latter is logged.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "stored value is not valid json; ignoring");
                None
            }
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(err) => warn!(key, error = %err, "failed to encode value"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the map intact.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

fn load(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read storage; starting empty");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "corrupt storage file; starting empty");
        BTreeMap::new()
    })
}

fn persist(inner: &Inner) {
    let Some(path) = inner.path.as_deref() else {
        return;
    };
    if let Err(err) = write_atomic(path, &inner.values) {
        warn!(path = %path.display(), error = %err, "failed to write storage");
    }
}

fn write_atomic(path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    let raw = serde_json::to_string_pretty(values)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_if_absent_keeps_existing_values() {
        let storage = Storage::in_memory();
        assert!(storage.init_if_absent("chatChannel", "General"));
        assert!(!storage.init_if_absent("chatChannel", "Random"));
        assert_eq!(storage.get("chatChannel").as_deref(), Some("General"));
    }

    #[test]
    fn clones_share_values() {
        let a = Storage::in_memory();
        let b = a.clone();
        a.set("k", "v");
        assert_eq!(b.get("k").as_deref(), Some("v"));
        assert_eq!(b.remove("k").as_deref(), Some("v"));
        assert!(a.get("k").is_none());
    }

    #[test]
    fn corrupt_json_value_reads_as_none() {
        let storage = Storage::in_memory();
        storage.set("tasks", "{not json");
        assert!(storage.get_json::<Vec<String>>("tasks").is_none());
        storage.set_json("tasks", &vec!["a".to_string()]);
        assert_eq!(
            storage.get_json::<Vec<String>>("tasks"),
            Some(vec!["a".to_string()])
        );
    }

    #[test]
    fn in_memory_store_has_no_path() {
        assert!(Storage::in_memory().path().is_none());
    }
}
