use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::errors::StorageError;
use crate::models::SessionId;

/// Key under which the active session id is persisted.
pub const SESSION_KEY: &str = "session_id";

/// Minimal persistent key-value capability (browser localStorage, a state
/// file, or memory under test).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same entries, so two [`SessionStore`]s
/// built from clones behave like two page loads over one browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Resolves and persists the session id.
///
/// Storage failures never propagate: the generated id is then kept for the
/// lifetime of this store only.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    current: Option<SessionId>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage, current: None }
    }

    /// Returns the persisted id, creating and persisting one on first use.
    pub fn get_or_create(&mut self) -> SessionId {
        if let Some(id) = &self.current {
            return id.clone();
        }

        let id = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => {
                debug!("Resumed session {raw}");
                SessionId::new(raw)
            }
            Ok(_) => self.persist_new(),
            Err(e) => {
                warn!("Session storage unreadable, using an ephemeral session: {e}");
                self.persist_new()
            }
        };

        self.current = Some(id.clone());
        id
    }

    /// Replaces the session id unconditionally. The caller must clear the
    /// conversation bound to the old id.
    pub fn reset(&mut self) -> SessionId {
        let id = self.persist_new();
        self.current = Some(id.clone());
        id
    }

    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    fn persist_new(&self) -> SessionId {
        let id = SessionId::generate();
        if let Err(e) = self.storage.set(SESSION_KEY, id.as_str()) {
            warn!("Failed to persist session {id}, keeping it for this run only: {e}");
        }
        id
    }
}
