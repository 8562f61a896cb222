//! Signed-in session storage
//!
//! The session returned by signup or login is handed to a [`SessionStore`]
//! owned by the host application, so nothing here relies on global state.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{AuthSession, Redirect};

use crate::error::SessionError;

/// A session together with the time it was stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub session: AuthSession,
    pub saved_at: DateTime<Utc>,
}

/// Result of a successful signup or login
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub session: AuthSession,
    pub redirect: Redirect,
}

impl From<AuthSession> for AuthOutcome {
    fn from(session: AuthSession) -> Self {
        Self {
            redirect: session.redirect(),
            session,
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn save(&self, session: &AuthSession) -> Result<(), SessionError>;

    fn load(&self) -> Result<Option<StoredSession>, SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Session store kept in memory
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<StoredSession>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        *self.slot() = Some(StoredSession {
            session: session.clone(),
            saved_at: Utc::now(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.slot().clone())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Session store persisted as a JSON file
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
}

impl SessionStore for FileSessionStore {
    fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            session: session.clone(),
            saved_at: Utc::now(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use shared::Role;

    fn session(role: Role) -> AuthSession {
        AuthSession {
            role,
            user_id: Some(42),
            username: Some("ab12".to_string()),
            name: None,
            email: None,
            token: Some("token-42".to_string()),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&session(Role::User)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().session.user_id, Some(42));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        store.save(&session(Role::Owner)).unwrap();
        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.session.role, Role::Owner);
        assert_eq!(stored.session.token.as_deref(), Some("token-42"));
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileSessionStore::new(path);
        assert!(matches!(store.load(), Err(SessionError::Encoding(_))));
    }

    #[test]
    fn test_outcome_redirect_follows_role() {
        assert_eq!(
            AuthOutcome::from(session(Role::Owner)).redirect,
            Redirect::OwnerDashboard
        );
        assert_eq!(AuthOutcome::from(session(Role::Admin)).redirect, Redirect::Home);
    }
}
