//! Process-wide session state: bearer token and role, persisted across runs.
//!
//! Expiry is never judged locally. A stored token counts as a session until the
//! server answers 401, at which point the API gateway clears it.

pub mod role;
pub mod storage;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::error::ClientResult;

pub use role::Role;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const SAVED_AT_KEY: &str = "savedAt";

/// Point-in-time view of the stored session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            token: Some(token.into()),
            role,
            saved_at: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Injectable handle over the persisted session. Clones share storage and
/// subscribers.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    changes: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = Self {
            storage,
            changes: Arc::new(watch::channel(Session::anonymous()).0),
        };
        store.changes.send_replace(store.snapshot());
        store
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// File-backed store in the configured directory
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let dir = config.storage_dir()?;
        Ok(Self::new(Arc::new(FileStorage::new(dir))))
    }

    pub fn get_token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored role; unrecognized strings read as `None`.
    pub fn get_role(&self) -> Option<Role> {
        self.read(ROLE_KEY).and_then(|raw| Role::parse_lenient(&raw))
    }

    pub fn snapshot(&self) -> Session {
        Session {
            token: self.get_token(),
            role: self.get_role(),
            saved_at: self
                .read(SAVED_AT_KEY)
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Writes token and role together. Only the login flow calls this.
    pub fn set_session(&self, token: &str, role: Role) -> ClientResult<()> {
        self.storage.set_all(&[
            (TOKEN_KEY, token.to_string()),
            (ROLE_KEY, role.as_str().to_string()),
            (SAVED_AT_KEY, Utc::now().to_rfc3339()),
        ])?;
        tracing::debug!("Session stored for role {}", role);
        self.changes.send_replace(self.snapshot());
        Ok(())
    }

    /// Removes token and role. Never fails from the caller's point of view:
    /// subscribers are told the session is gone even if the file write failed.
    pub fn clear_session(&self) {
        if let Err(e) = self.storage.remove_all(&[TOKEN_KEY, ROLE_KEY, SAVED_AT_KEY]) {
            tracing::error!("Failed to clear persisted session: {}", e);
        }
        self.changes.send_replace(Session::anonymous());
    }

    /// Receiver notified after every `set_session` / `clear_session`.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Reading '{}' from session storage failed: {}", key, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.get_token().is_some())
            .field("role", &self.get_role())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reads_absent() {
        let store = SessionStore::in_memory();
        assert_eq!(store.get_token(), None);
        assert_eq!(store.get_role(), None);
        assert!(!store.snapshot().is_authenticated());
    }

    #[test]
    fn set_then_clear() {
        let store = SessionStore::in_memory();
        store.set_session("tok-1", Role::Recruiter).unwrap();

        let session = store.snapshot();
        assert_eq!(session.token.as_deref(), Some("tok-1"));
        assert_eq!(session.role, Some(Role::Recruiter));
        assert!(session.saved_at.is_some());

        store.clear_session();
        assert_eq!(store.get_token(), None);
        assert_eq!(store.get_role(), None);
    }

    #[test]
    fn unrecognized_role_reads_as_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_all(&[(TOKEN_KEY, "t".to_string()), (ROLE_KEY, "superuser".to_string())])
            .unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.get_token().as_deref(), Some("t"));
        assert_eq!(store.get_role(), None);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();
        assert!(!rx.borrow().is_authenticated());

        store.set_session("tok", Role::Admin).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().role, Some(Role::Admin));

        store.clear_session();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }
}
