//! Session storage for the signed-in user
//!
//! The client keeps exactly two values between runs: the access token and the
//! user id. Both are written together at verification, cleared together at
//! sign-out, and their joint presence is the only definition of
//! "authenticated" this client has. Token expiry is not checked locally; an
//! expired token surfaces as a failing API call.

use std::{
    collections::HashMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};

/// Storage key for the bearer token
pub const ACCESS_TOKEN_KEY: &str = "amiglot_access_token";

/// Storage key for the signed-in user id
pub const USER_ID_KEY: &str = "amiglot_user_id";

/// Key/value storage backing a [`SessionManager`]
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when the key was never set or has been cleared
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Remove a value; clearing a missing key is not an error
    fn clear(&self, key: &str) -> SessionResult<()>;
}

/// Process-local store, used by tests and short-lived tools
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk
///
/// Every write rewrites the whole file. There is no locking: the client has a
/// single writer and last write wins.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SessionResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the file atomically
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the old one. Temporary files are created owner-only
    /// (`0o600` on unix), so the token is never readable by other users.
    fn store(&self, entries: &HashMap<String, String>) -> SessionResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

/// Session manager for the access token and user id pair
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Create a new session manager over a store
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Session manager backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Persist the credentials returned by a successful verification
    pub fn create_session(&self, access_token: &str, user_id: &str) -> SessionResult<()> {
        info!("Creating session for user: {}", user_id);

        self.store.set(ACCESS_TOKEN_KEY, access_token)?;
        self.store.set(USER_ID_KEY, user_id)?;

        Ok(())
    }

    /// Bearer token of the current session
    pub fn access_token(&self) -> SessionResult<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Id of the signed-in user
    pub fn user_id(&self) -> SessionResult<Option<String>> {
        self.store.get(USER_ID_KEY)
    }

    /// Both values are present. Storage failures read as signed out.
    pub fn is_authenticated(&self) -> bool {
        let present = |value: SessionResult<Option<String>>| match value {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(err) => {
                warn!("Failed to read session: {}", err);
                false
            }
        };

        present(self.access_token()) && present(self.user_id())
    }

    /// Clear the token and the user id together
    pub fn delete_session(&self) -> SessionResult<()> {
        info!("Deleting session");

        self.store.clear(ACCESS_TOKEN_KEY)?;
        self.store.clear(USER_ID_KEY)?;

        Ok(())
    }
}
