//! Keyed session storage.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::SessionState;

/// Opaque session identifier held by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh token for a first-contact client.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from session token to session state.
///
/// Sessions come into existence on first contact. The returned handle
/// serializes all access to one session's state, so overlapping requests
/// from the same session cannot race the authentication transition.
pub trait SessionStore: Send + Sync {
    fn session(&self, token: &SessionToken) -> Arc<Mutex<SessionState>>;
}

/// Process-held session storage.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, Arc<Mutex<SessionState>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("Lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn session(&self, token: &SessionToken) -> Arc<Mutex<SessionState>> {
        if let Some(existing) = self.sessions.read().expect("Lock poisoned").get(token) {
            return Arc::clone(existing);
        }
        let mut sessions = self.sessions.write().expect("Lock poisoned");
        Arc::clone(sessions.entry(token.clone()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation_on_first_contact() {
        let store = InMemorySessionStore::new();
        assert!(store.is_empty());

        let token = SessionToken::generate();
        let handle = store.session(&token);
        assert_eq!(store.len(), 1);
        assert_eq!(*handle.lock().unwrap(), SessionState::default());
    }

    #[test]
    fn test_same_token_same_session() {
        let store = InMemorySessionStore::new();
        let token = SessionToken::new("abc");

        store.session(&token).lock().unwrap().credits = 3;
        assert_eq!(store.session(&token).lock().unwrap().credits, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = InMemorySessionStore::new();
        let first = SessionToken::new("first");
        let second = SessionToken::new("second");

        store.session(&first).lock().unwrap().grant();

        assert!(store.session(&first).lock().unwrap().is_authenticated());
        assert!(!store.session(&second).lock().unwrap().is_authenticated());
    }
}
