//! services/api/src/adapters/session_cache.rs
//!
//! Implementations of the `SessionCache` port: a JSON file on disk that
//! survives restarts, and an in-memory slot for tests.

use async_trait::async_trait;
use idea_ranker_core::domain::Session;
use idea_ranker_core::ports::{PortError, PortResult, SessionCache};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;

//=========================================================================================
// FileSessionCache
//=========================================================================================

/// Stores the session as a JSON document at `path`.
#[derive(Clone, Debug)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    async fn get(&self) -> PortResult<Option<Session>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        let session = serde_json::from_str(&contents)
            .map_err(|e| PortError::Unexpected(format!("Corrupt session cache: {}", e)))?;
        Ok(Some(session))
    }

    async fn set(&self, session: &Session) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn clear(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

//=========================================================================================
// InMemorySessionCache
//=========================================================================================

#[derive(Default)]
pub struct InMemorySessionCache {
    slot: RwLock<Option<Session>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self) -> PortResult<Option<Session>> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, session: &Session) -> PortResult<()> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            uid: "u-1".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            photo_url: Some("https://example.com/ada.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSessionCache::new(dir.path().join("nested").join("session.json"));

        assert_eq!(cache.get().await.unwrap(), None);
        cache.set(&session()).await.unwrap();
        assert_eq!(cache.get().await.unwrap(), Some(session()));

        cache.clear().await.unwrap();
        assert_eq!(cache.get().await.unwrap(), None);
        // Clearing an empty slot is fine.
        cache.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_cache_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionCache::new(&path).set(&session()).await.unwrap();

        let reopened = FileSessionCache::new(&path);
        assert_eq!(reopened.get().await.unwrap(), Some(session()));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileSessionCache::new(&path).get().await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_memory_cache() {
        let cache = InMemorySessionCache::new();
        cache.set(&session()).await.unwrap();
        assert_eq!(cache.get().await.unwrap(), Some(session()));
        cache.clear().await.unwrap();
        assert_eq!(cache.get().await.unwrap(), None);
    }
}
