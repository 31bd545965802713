//! File-backed session store
//!
//! Persists the session as a flat JSON object of strings. The file is re-read
//! on every lookup so a token written by one CLI invocation is visible to the
//! next request of another.

use super::{SessionError, SessionStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Session store backed by a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location under the user's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("ipo-client").join("session.json"))
            .unwrap_or_else(|| PathBuf::from("./ipo_session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    error: e.to_string(),
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |e: std::io::Error| SessionError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(values).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        std::fs::write(&self.path, content).map_err(io_err)
    }

    fn update<F>(&self, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // A corrupt file is replaced rather than blocking logout/login forever
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(SessionError::Corrupt { path, error }) => {
                tracing::warn!("Discarding corrupt session file {:?}: {}", path, error);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        f(&mut values);
        self.write_all(&values)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                tracing::warn!("Failed to read session store: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{clear_session, load_session, save_session, Session};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        assert!(store.get("access_token").is_none());
        store.remove("access_token").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let first = FileStore::new(&path);
        save_session(
            &first,
            &Session {
                token: "jwt-token".to_string(),
                username: "carol".to_string(),
            },
        )
        .unwrap();

        let second = FileStore::new(&path);
        let session = load_session(&second).unwrap();
        assert_eq!(session.token, "jwt-token");
        assert_eq!(session.username, "carol");

        clear_session(&second).unwrap();
        assert!(first.get("access_token").is_none());
        assert!(first.get("username").is_none());
    }

    #[test]
    fn test_values_are_plain_strings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::new(&path);
        store.set("access_token", "a\"b").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["access_token"], "a\"b");
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("access_token").is_none());

        store.set("access_token", "fresh").unwrap();
        assert_eq!(store.get("access_token").as_deref(), Some("fresh"));
    }
}
