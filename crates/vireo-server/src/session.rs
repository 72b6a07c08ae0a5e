//! Cookie-keyed session registry.
//!
//! A session is only stored once it holds data, so clients that never
//! touch their session (crawlers, health checks) cost nothing after their
//! request completes.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;
use vireo_core::{MemorySessionStore, SessionStore};

/// A session resolved for one request.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Session ID, the value of the session cookie.
    pub id: String,
    /// The session's storage.
    pub store: Arc<MemorySessionStore>,
    /// True if the session was created for this request and is not stored
    /// yet; see [`SessionRegistry::commit`].
    pub created: bool,
}

/// Sessions of all clients, keyed by session ID.
///
/// IDs are UUID v7 strings handed out by the registry; an ID it did not
/// issue (or has forgotten) gets a fresh session under a new ID.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<MemorySessionStore>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, or a new, unstored one when `id` is
    /// absent or unknown.
    pub fn resolve(&self, id: Option<&str>) -> ResolvedSession {
        if let Some(id) = id {
            if let Some(store) = self.sessions.get(id) {
                return ResolvedSession {
                    id: id.to_string(),
                    store: Arc::clone(store.value()),
                    created: false,
                };
            }
        }

        ResolvedSession {
            id: Uuid::now_v7().to_string(),
            store: Arc::new(MemorySessionStore::new()),
            created: true,
        }
    }

    /// Settles a session after its request: a new session is stored once it
    /// holds data and a stored session that was emptied is forgotten.
    ///
    /// Returns true if a new session was stored, in which case the session
    /// cookie must be sent back.
    pub fn commit(&self, session: &ResolvedSession) -> bool {
        match (session.created, session.store.is_empty()) {
            (true, false) => {
                self.sessions
                    .insert(session.id.clone(), Arc::clone(&session.store));
                true
            }
            (false, true) => {
                self.sessions.remove(&session.id);
                false
            }
            _ => false,
        }
    }

    /// Forgets a session.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
