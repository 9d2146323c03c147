//! # Session Store
//!
//! Holds the opaque session token in durable client storage. The token lives
//! under a single fixed key ([`TOKEN_KEY`]) of a [`StorageArea`], so a session
//! survives a restart when the area is file backed.
//!
//! There is no expiry timer. A stale token is only discovered when the server
//! answers 401, at which point [`ApiClient`](crate::ApiClient) clears it.

use crate::error::StorageError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Storage key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Key/value storage area, modelled on the DOM's `localStorage`.
pub trait StorageArea: Send + Sync {
    /// Retrieves the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Ephemeral storage. Used by tests and when no session file is configured.
#[derive(Default)]
pub struct InMemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageArea for InMemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.map).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.map).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.map).remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
///
/// The whole file is rewritten on every mutation. Reads are served from the
/// in-memory copy loaded at [`open`](JsonFileStorage::open).
pub struct JsonFileStorage {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileStorage {
    /// Opens the storage file at `path`. A missing file is an empty store; a
    /// file that is not a JSON object of strings is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let map = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = map.len(), "Opened session storage");
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }
}

impl StorageArea for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.map).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = lock(&self.map);
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut map = lock(&self.map);
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}

/// Owner of the session token.
///
/// Cloning yields another handle onto the same storage; a write through any
/// handle is visible to the next read through every other one.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageArea>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StorageArea>) -> Self {
        Self { storage }
    }

    /// A store backed by [`InMemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()))
    }

    /// Persists `token`, replacing any previous one.
    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, token)?;
        debug!("Session token stored");
        Ok(())
    }

    /// The current token, or `None` when unauthenticated.
    pub fn get(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY)
    }

    /// Removes the token.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_KEY)?;
        debug!("Session token cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
