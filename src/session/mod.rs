//! Session Storage
//!
//! Client-side persisted key-value storage holding the session pair
//! (`access_token`, `username`). The HTTP client reads the token from here on
//! every request; login writes the pair and logout clears it.
//!
//! ## Stores
//!
//! - [`MemoryStore`]: process-local, used in tests and ephemeral runs
//! - [`FileStore`]: JSON file on disk, shared between CLI invocations

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "access_token";

/// Storage key for the logged-in username
pub const USERNAME_KEY: &str = "username";

/// Persisted string key-value storage
///
/// Values are plain strings with no structured serialization.
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Shared handle to a session store
pub type SharedStore = Arc<dyn SessionStore>;

/// The client-held proof of authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Read the persisted token, if any
pub fn token(store: &dyn SessionStore) -> Option<String> {
    store.get(TOKEN_KEY)
}

/// Read the persisted username, if any
pub fn username(store: &dyn SessionStore) -> Option<String> {
    store.get(USERNAME_KEY)
}

/// Load the full session. Requires a token; the username defaults to empty.
pub fn load_session(store: &dyn SessionStore) -> Option<Session> {
    let token = token(store)?;
    Some(Session {
        token,
        username: username(store).unwrap_or_default(),
    })
}

/// Persist both halves of a session
///
/// All or nothing: if the username cannot be written the token is removed
/// again, so a failed save never leaves the guard open.
pub fn save_session(store: &dyn SessionStore, session: &Session) -> Result<(), SessionError> {
    store.set(TOKEN_KEY, &session.token)?;
    if let Err(e) = store.set(USERNAME_KEY, &session.username) {
        if let Err(rollback) = store.remove(TOKEN_KEY) {
            tracing::warn!("Failed to roll back access token: {}", rollback);
        }
        return Err(e);
    }
    tracing::debug!(username = %session.username, "Session saved");
    Ok(())
}

/// Remove both session keys regardless of prior state
pub fn clear_session(store: &dyn SessionStore) -> Result<(), SessionError> {
    // Attempt both removals even if the first fails
    let token_result = store.remove(TOKEN_KEY);
    let username_result = store.remove(USERNAME_KEY);
    token_result?;
    username_result?;
    tracing::debug!("Session cleared");
    Ok(())
}

/// Errors raised by persisted session storage
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Session file {path:?} is corrupt: {error}")]
    Corrupt { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_session_requires_token() {
        let store = MemoryStore::new();
        store.set(USERNAME_KEY, "alice").unwrap();
        assert!(load_session(&store).is_none());

        store.set(TOKEN_KEY, "tok").unwrap();
        let session = load_session(&store).unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn test_save_then_clear() {
        let store = MemoryStore::new();
        let session = Session {
            token: "abc.def".to_string(),
            username: "bob".to_string(),
        };

        save_session(&store, &session).unwrap();
        assert_eq!(token(&store).as_deref(), Some("abc.def"));
        assert_eq!(username(&store).as_deref(), Some("bob"));

        clear_session(&store).unwrap();
        assert!(token(&store).is_none());
        assert!(username(&store).is_none());
    }

    /// Accepts every key except the username
    struct RejectsUsername(MemoryStore);

    impl SessionStore for RejectsUsername {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
            if key == USERNAME_KEY {
                return Err(SessionError::Io {
                    path: PathBuf::from("session.json"),
                    error: "disk full".to_string(),
                });
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), SessionError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_failed_save_leaves_no_token() {
        let store = RejectsUsername(MemoryStore::new());
        let session = Session {
            token: "leaked".to_string(),
            username: "carol".to_string(),
        };

        assert!(save_session(&store, &session).is_err());
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.0.is_empty());
    }

    #[test]
    fn test_clear_empty_store() {
        let store = MemoryStore::new();
        clear_session(&store).unwrap();
        assert!(store.is_empty());
    }
}
