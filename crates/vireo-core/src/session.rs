//! Session storage.
//!
//! A session is handed to the request explicitly as an
//! `Arc<dyn SessionStore>`; nothing in Vireo reaches for ambient global
//! session state.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde_json::Value;

/// Key/value session storage holding JSON values.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);

    /// Removes `key`, returning its previous value.
    fn remove(&self, key: &str) -> Option<Value>;

    /// Removes every key.
    fn clear(&self);

    /// Returns true if the session holds no values.
    fn is_empty(&self) -> bool;
}

/// An in-process session backed by a locked hash map.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vireo_core::{MemorySessionStore, SessionStore};
///
/// let session = MemorySessionStore::new();
/// session.set("user", json!("alice"));
/// assert_eq!(session.get("user"), Some(json!("alice")));
///
/// session.remove("user");
/// assert!(session.is_empty());
/// ```
#[derive(Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySessionStore {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }

    fn clear(&self) {
        self.values.write().clear();
    }

    fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySessionStore")
            .field("len", &self.len())
            .finish()
    }
}
