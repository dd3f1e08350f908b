//! Durable storage for the token pair.
//!
//! The store holds exactly two strings under fixed keys and performs no
//! validation; expiry inspection belongs to the session manager. `set`
//! replaces both tokens in one step, so a reader never observes a new
//! access token paired with a stale refresh token.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::Session;

/// Abstraction over token-pair persistence.
/// Implementations: FileTokenStore (durable), MemoryTokenStore (tests,
/// embedders with their own persistence).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Option<Session>;

    /// Overwrite both tokens. Atomic from the caller's perspective: a
    /// subsequent `get` in this process returns either the old pair or the
    /// new pair, never a mix.
    async fn set(&self, session: Session);

    /// Remove both tokens.
    async fn clear(&self);
}

// ── File-backed store ────────────────────────────────────────

/// JSON file on disk holding `{"access_token": ..., "refresh_token": ...}`.
/// Survives process restarts. Writes go to a sibling temp file first and
/// are renamed into place, so a crash mid-write leaves the old pair intact.
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes writers and makes the read-after-write ordering observable
    // within the process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Option<Session> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable, ignoring");
                None
            }
        }
    }

    fn write_file(&self, session: &Session) -> std::io::Result<()> {
        let bytes = serde_json::to_vec_pretty(session).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("tmp");
        {
            let mut f = std::fs::File::create(&tmp)?;
            f.write_all(&bytes)?;
            f.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Option<Session> {
        let _guard = self.lock.lock().expect("token store lock poisoned");
        self.read_file()
    }

    async fn set(&self, session: Session) {
        let _guard = self.lock.lock().expect("token store lock poisoned");
        if let Err(e) = self.write_file(&session) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to persist session");
        }
    }

    async fn clear(&self) {
        let _guard = self.lock.lock().expect("token store lock poisoned");
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to remove session file");
            }
        }
    }
}

// ── In-memory store ──────────────────────────────────────────

#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<Session> {
        self.inner.lock().expect("token store lock poisoned").clone()
    }

    async fn set(&self, session: Session) {
        *self.inner.lock().expect("token store lock poisoned") = Some(session);
    }

    async fn clear(&self) {
        *self.inner.lock().expect("token store lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get().await.is_none());

        store.set(Session::new("acc", "ref")).await;
        assert_eq!(store.get().await, Some(Session::new("acc", "ref")));

        store.clear().await;
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::new(&path);
        store.set(Session::new("acc-1", "ref-1")).await;
        drop(store);

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get().await, Some(Session::new("acc-1", "ref-1")));
    }

    #[tokio::test]
    async fn test_file_store_set_replaces_whole_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));

        store.set(Session::new("acc-1", "ref-1")).await;
        store.set(Session::new("acc-2", "ref-2")).await;

        let got = store.get().await.unwrap();
        assert_eq!(got.access, "acc-2");
        assert_eq!(got.refresh, "ref-2");
    }

    #[tokio::test]
    async fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));

        store.clear().await;
        store.set(Session::new("a", "r")).await;
        store.clear().await;
        store.clear().await;
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.get().await.is_none());
    }

    #[test]
    fn test_session_file_uses_fixed_keys() {
        let json = serde_json::to_value(Session::new("a", "r")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "a", "refresh_token": "r"})
        );
    }
}
