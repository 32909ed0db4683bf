//! Key-value persistence for storefront state.
//!
//! Everything the storefront remembers lives under a handful of string keys,
//! each holding one JSON document that is overwritten wholesale on every write.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
    rc::Rc,
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const CART_KEY: &str = "cart";
pub const FAVORITES_KEY: &str = "favorites";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const ORDERS_KEY: &str = "orders";

const USER_KEY_PREFIX: &str = "user_";

/// Key of the user record registered under `email`.
pub fn user_key(email: &str) -> String {
    format!("{USER_KEY_PREFIX}{email}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store payload could not be encoded or decoded")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed, string-valued storage.
///
/// Methods take `&self`; backends use interior mutability so one handle can be
/// shared by every manager of a page context.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

pub type SharedStore = Rc<dyn KeyValueStore>;

/// Reads and decodes the JSON document under `key`.
///
/// A payload that does not decode as `T` is treated the same as an absent key.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::debug!(key, error = %err, "ignoring malformed stored payload");
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Process-local store, gone when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The whole file is rewritten after every `set`/`remove`, so the file on disk
/// always matches the in-memory map.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    fn flush(&self) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string_pretty(&*self.entries.borrow())?;
        fs::write(&self.path, raw).map_err(io_err)
    }

    /// Puts `key` back the way it was before a write that failed to reach disk.
    fn restore(&self, key: &str, previous: Option<String>) {
        let mut entries = self.entries.borrow_mut();
        match previous {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let previous = self
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush().inspect_err(|_| self.restore(key, previous))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let Some(previous) = self.entries.borrow_mut().remove(key) else {
            return Ok(());
        };
        self.flush().inspect_err(|_| self.restore(key, Some(previous)))
    }
}
