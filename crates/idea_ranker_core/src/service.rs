//! crates/idea_ranker_core/src/service.rs
//!
//! The use cases of the application: submitting and listing ideas for a
//! session, and keeping the signed-in session in step with the identity
//! provider and the local cache.

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::{Idea, IdeaDraft, NewIdea, RankedIdea, Session};
use crate::ports::{IdeaStore, IdentityProvider, PortError, PortResult, SessionCache};
use crate::rating::{compute_rating, rank_with_positions};

//=========================================================================================
// Error Types
//=========================================================================================

/// Input problems that block a submission. Both are fixed by editing the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("You haven't written anything yet.")]
    NothingEntered,
    #[error("Idea name and short description are required.")]
    MissingRequiredFields,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No signed-in user to own the idea")]
    NotSignedIn,
    /// The store rejected the insert; the idea must be treated as not saved.
    #[error("Failed to save idea: {0}")]
    Persistence(#[source] PortError),
}

//=========================================================================================
// IdeaService
//=========================================================================================

/// Submits and lists ideas on behalf of an explicit session.
#[derive(Clone)]
pub struct IdeaService {
    store: Arc<dyn IdeaStore>,
}

impl IdeaService {
    pub fn new(store: Arc<dyn IdeaStore>) -> Self {
        Self { store }
    }

    /// Validates the draft, rates it, persists it under the session's user and
    /// returns that user's freshly ranked collection.
    ///
    /// Validation happens before any store call. A failed insert is not retried.
    pub async fn submit(
        &self,
        session: &Session,
        draft: IdeaDraft,
    ) -> Result<Vec<RankedIdea>, SubmitError> {
        validate(&draft)?;
        if session.uid.trim().is_empty() {
            return Err(SubmitError::NotSignedIn);
        }

        let rating = compute_rating(
            draft.scores.simplicity,
            draft.scores.practicality,
            draft.scores.appeal,
            draft.scores.gut_feeling,
        );
        let new_idea = NewIdea {
            title: draft.title,
            short_description: draft.short_description,
            full_description: draft.full_description,
            scores: draft.scores,
            rating,
        };

        let id = self
            .store
            .insert(&session.uid, new_idea.clone())
            .await
            .map_err(|e| {
                error!("Error adding new idea for {}: {:?}", session.uid, e);
                SubmitError::Persistence(e)
            })?;
        info!(idea_id = %id, rating, "Idea saved");

        let existing = self.load(&session.uid).await;
        let mut ideas = Vec::with_capacity(existing.len() + 1);
        ideas.push(new_idea.into_idea(id.clone(), session.uid.clone()));
        // The store may or may not already return the idea we just inserted.
        ideas.extend(existing.into_iter().filter(|idea| idea.id != id));

        Ok(rank_with_positions(ideas))
    }

    /// Returns the session user's ideas, ranked. Retrieval errors yield an empty list.
    pub async fn fetch(&self, session: &Session) -> Vec<RankedIdea> {
        rank_with_positions(self.load(&session.uid).await)
    }

    async fn load(&self, owner_id: &str) -> Vec<Idea> {
        match self.store.query_by_owner(owner_id).await {
            Ok(ideas) => {
                debug!("Fetched {} ideas for {}", ideas.len(), owner_id);
                ideas
            }
            Err(e) => {
                error!("Error fetching ideas for {}: {:?}", owner_id, e);
                Vec::new()
            }
        }
    }
}

/// Checks a draft before submission. An untouched form is reported as such,
/// not as missing fields.
pub fn validate(draft: &IdeaDraft) -> Result<(), ValidationError> {
    if draft.is_unmodified() {
        return Err(ValidationError::NothingEntered);
    }
    if draft.missing_required_fields() {
        return Err(ValidationError::MissingRequiredFields);
    }
    Ok(())
}

//=========================================================================================
// SessionManager
//=========================================================================================

/// Owns the signed-in session and mirrors it into the local cache.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    cache: Arc<dyn SessionCache>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, cache: Arc<dyn SessionCache>) -> Self {
        Self {
            provider,
            cache,
            current: RwLock::new(None),
        }
    }

    /// Loads the last known session from the cache. Run once at startup.
    pub async fn restore(&self) -> Option<Session> {
        let cached = match self.cache.get().await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Could not read cached session: {:?}", e);
                None
            }
        };
        if let Some(session) = &cached {
            info!("Restored cached session for {}", session.uid);
        }
        *self.current.write().await = cached.clone();
        cached
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Signs in through the provider. On failure nothing changes.
    pub async fn sign_in(&self) -> PortResult<Session> {
        let session = self.provider.sign_in().await.map_err(|e| {
            error!("Error signing in: {:?}", e);
            e
        })?;
        self.remember(&session).await;
        *self.current.write().await = Some(session.clone());
        info!("Signed in as {}", session.uid);
        Ok(session)
    }

    /// Signs out through the provider. On failure the session is kept.
    pub async fn sign_out(&self) -> PortResult<()> {
        self.provider.sign_out().await.map_err(|e| {
            error!("Error signing out: {:?}", e);
            e
        })?;
        self.forget().await;
        *self.current.write().await = None;
        info!("Signed out");
        Ok(())
    }

    /// Records a session change reported by the provider.
    pub async fn apply_session_change(&self, change: Option<Session>) {
        match &change {
            Some(session) => self.remember(session).await,
            None => self.forget().await,
        }
        *self.current.write().await = change;
    }

    /// Follows the provider's change notifications until the stream ends.
    pub async fn watch_session_changes(&self) {
        let mut changes = self.provider.session_changes();
        while let Some(change) = changes.next().await {
            debug!("Session change: signed_in={}", change.is_some());
            self.apply_session_change(change).await;
        }
    }

    async fn remember(&self, session: &Session) {
        if let Err(e) = self.cache.set(session).await {
            warn!("Could not cache session: {:?}", e);
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!("Could not clear cached session: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scores;
    use crate::ports::SessionChangeStream;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    //-------------------------------------------------------------------------------------
    // Fakes
    //-------------------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeStore {
        ideas: Mutex<Vec<Idea>>,
        inserts: AtomicUsize,
        fail_insert: AtomicBool,
        fail_query: AtomicBool,
    }

    impl FakeStore {
        fn with(ideas: Vec<Idea>) -> Self {
            Self {
                ideas: Mutex::new(ideas),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl IdeaStore for FakeStore {
        async fn insert(&self, owner_id: &str, idea: NewIdea) -> PortResult<String> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(PortError::Unexpected("store offline".to_string()));
            }
            let mut ideas = self.ideas.lock().unwrap();
            let id = format!("idea-{}", ideas.len() + 1);
            ideas.push(idea.into_idea(id.clone(), owner_id.to_string()));
            Ok(id)
        }

        async fn query_by_owner(&self, owner_id: &str) -> PortResult<Vec<Idea>> {
            if self.fail_query.load(Ordering::SeqCst) {
                return Err(PortError::Unexpected("query failed".to_string()));
            }
            Ok(self
                .ideas
                .lock()
                .unwrap()
                .iter()
                .filter(|idea| idea.owner_id == owner_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeCache {
        slot: Mutex<Option<Session>>,
        fail_get: bool,
    }

    #[async_trait]
    impl SessionCache for FakeCache {
        async fn get(&self) -> PortResult<Option<Session>> {
            if self.fail_get {
                return Err(PortError::Unexpected("corrupt cache".to_string()));
            }
            Ok(self.slot.lock().unwrap().clone())
        }

        async fn set(&self, session: &Session) -> PortResult<()> {
            *self.slot.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn clear(&self) -> PortResult<()> {
            *self.slot.lock().unwrap() = None;
            Ok(())
        }
    }

    struct FakeProvider {
        session: Session,
        fail: bool,
        changes: Mutex<Vec<Option<Session>>>,
    }

    impl FakeProvider {
        fn new(fail: bool) -> Self {
            Self {
                session: session("alice"),
                fail,
                changes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self) -> PortResult<Session> {
            if self.fail {
                return Err(PortError::Unauthorized);
            }
            Ok(self.session.clone())
        }

        async fn sign_out(&self) -> PortResult<()> {
            if self.fail {
                return Err(PortError::Unexpected("network".to_string()));
            }
            Ok(())
        }

        fn session_changes(&self) -> SessionChangeStream {
            let changes = std::mem::take(&mut *self.changes.lock().unwrap());
            Box::pin(futures::stream::iter(changes))
        }
    }

    fn session(uid: &str) -> Session {
        Session {
            uid: uid.to_string(),
            display_name: Some("Alice Example".to_string()),
            email: Some("alice@example.com".to_string()),
            photo_url: None,
        }
    }

    fn stored(id: &str, owner: &str, rating: f64) -> Idea {
        Idea {
            id: id.to_string(),
            owner_id: owner.to_string(),
            title: id.to_string(),
            short_description: "pitch".to_string(),
            full_description: String::new(),
            scores: Scores::default(),
            rating,
        }
    }

    fn draft(title: &str, short: &str, score: u8) -> IdeaDraft {
        IdeaDraft {
            title: title.to_string(),
            short_description: short.to_string(),
            full_description: String::new(),
            scores: Scores::new(score, score, score, score),
        }
    }

    //-------------------------------------------------------------------------------------
    // IdeaService
    //-------------------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_title_is_rejected_without_store_call() {
        let store = Arc::new(FakeStore::default());
        let service = IdeaService::new(store.clone());

        let result = service.submit(&session("alice"), draft("", "Y", 80)).await;

        assert!(matches!(
            result,
            Err(SubmitError::Validation(ValidationError::MissingRequiredFields))
        ));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_untouched_draft_is_nothing_entered() {
        let store = Arc::new(FakeStore::default());
        let service = IdeaService::new(store.clone());

        let result = service.submit(&session("alice"), IdeaDraft::default()).await;

        assert!(matches!(
            result,
            Err(SubmitError::Validation(ValidationError::NothingEntered))
        ));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_uid_is_rejected() {
        let store = Arc::new(FakeStore::default());
        let service = IdeaService::new(store.clone());

        let result = service.submit(&session(" "), draft("X", "Y", 80)).await;

        assert!(matches!(result, Err(SubmitError::NotSignedIn)));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_rates_and_ranks_among_existing() {
        let store = Arc::new(FakeStore::with(vec![
            stored("old-high", "alice", 4.5),
            stored("old-low", "alice", 1.0),
            stored("someone-else", "bob", 5.0),
        ]));
        let service = IdeaService::new(store.clone());

        let ranked = service
            .submit(&session("alice"), draft("X", "Y", 80))
            .await
            .unwrap();

        let ids: Vec<&str> = ranked.iter().map(|r| r.idea.id.as_str()).collect();
        assert_eq!(ids, ["old-high", "idea-4", "old-low"]);
        let new = &ranked[1];
        assert_eq!(new.position, 2);
        assert_eq!(new.idea.rating, 4.0);
        assert_eq!(new.idea.owner_id, "alice");
        assert_eq!(new.idea.title, "X");
    }

    #[tokio::test]
    async fn test_new_idea_is_not_duplicated_and_leads_ties() {
        let store = Arc::new(FakeStore::with(vec![stored("tied", "alice", 4.0)]));
        let service = IdeaService::new(store);

        let ranked = service
            .submit(&session("alice"), draft("X", "Y", 80))
            .await
            .unwrap();

        let ids: Vec<&str> = ranked.iter().map(|r| r.idea.id.as_str()).collect();
        assert_eq!(ids, ["idea-2", "tied"]);
    }

    #[tokio::test]
    async fn test_insert_failure_is_reported() {
        let store = Arc::new(FakeStore::default());
        store.fail_insert.store(true, Ordering::SeqCst);
        let service = IdeaService::new(store.clone());

        let result = service.submit(&session("alice"), draft("X", "Y", 10)).await;

        assert!(matches!(result, Err(SubmitError::Persistence(_))));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_requery_failure_still_returns_new_idea() {
        let store = Arc::new(FakeStore::with(vec![stored("old", "alice", 3.0)]));
        store.fail_query.store(true, Ordering::SeqCst);
        let service = IdeaService::new(store);

        let ranked = service
            .submit(&session("alice"), draft("X", "Y", 10))
            .await
            .unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].idea.id, "idea-2");
    }

    #[tokio::test]
    async fn test_fetch_ranks_owned_ideas() {
        let store = Arc::new(FakeStore::with(vec![
            stored("a", "alice", 3.2),
            stored("b", "alice", 4.7),
            stored("c", "alice", 4.7),
            stored("d", "alice", 1.0),
            stored("e", "bob", 2.0),
        ]));
        let service = IdeaService::new(store);

        let ranked = service.fetch(&session("alice")).await;

        let ids: Vec<&str> = ranked.iter().map(|r| r.idea.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let store = Arc::new(FakeStore::with(vec![stored("a", "alice", 3.2)]));
        store.fail_query.store(true, Ordering::SeqCst);
        let service = IdeaService::new(store);

        assert!(service.fetch(&session("alice")).await.is_empty());
    }

    //-------------------------------------------------------------------------------------
    // SessionManager
    //-------------------------------------------------------------------------------------

    #[tokio::test]
    async fn test_restore_reads_cache() {
        let cache = Arc::new(FakeCache::default());
        *cache.slot.lock().unwrap() = Some(session("alice"));
        let manager = SessionManager::new(Arc::new(FakeProvider::new(false)), cache);

        assert_eq!(manager.restore().await, Some(session("alice")));
        assert_eq!(manager.current().await, Some(session("alice")));
    }

    #[tokio::test]
    async fn test_restore_treats_cache_error_as_signed_out() {
        let cache = Arc::new(FakeCache {
            fail_get: true,
            ..Default::default()
        });
        let manager = SessionManager::new(Arc::new(FakeProvider::new(false)), cache);

        assert_eq!(manager.restore().await, None);
        assert_eq!(manager.current().await, None);
    }

    #[tokio::test]
    async fn test_sign_in_and_out_update_cache() {
        let cache = Arc::new(FakeCache::default());
        let manager = SessionManager::new(Arc::new(FakeProvider::new(false)), cache.clone());

        let signed_in = manager.sign_in().await.unwrap();
        assert_eq!(signed_in.uid, "alice");
        assert_eq!(*cache.slot.lock().unwrap(), Some(session("alice")));

        manager.sign_out().await.unwrap();
        assert_eq!(*cache.slot.lock().unwrap(), None);
        assert_eq!(manager.current().await, None);
    }

    #[tokio::test]
    async fn test_failed_sign_in_changes_nothing() {
        let cache = Arc::new(FakeCache::default());
        let manager = SessionManager::new(Arc::new(FakeProvider::new(true)), cache.clone());

        assert!(manager.sign_in().await.is_err());
        assert_eq!(*cache.slot.lock().unwrap(), None);
        assert_eq!(manager.current().await, None);
    }

    #[tokio::test]
    async fn test_failed_sign_out_keeps_session() {
        let cache = Arc::new(FakeCache::default());
        *cache.slot.lock().unwrap() = Some(session("alice"));
        let manager = SessionManager::new(Arc::new(FakeProvider::new(true)), cache.clone());
        manager.restore().await;

        assert!(manager.sign_out().await.is_err());
        assert_eq!(manager.current().await, Some(session("alice")));
        assert_eq!(*cache.slot.lock().unwrap(), Some(session("alice")));
    }

    #[tokio::test]
    async fn test_quick_sign_out_and_in_stays_signed_in() {
        let cache = Arc::new(FakeCache::default());
        let manager = SessionManager::new(Arc::new(FakeProvider::new(false)), cache.clone());
        manager.sign_in().await.unwrap();

        manager.sign_out().await.unwrap();
        manager.sign_in().await.unwrap();
        // Nothing the manager did itself comes back through the change stream.
        manager.watch_session_changes().await;

        assert_eq!(manager.current().await, Some(session("alice")));
        assert_eq!(*cache.slot.lock().unwrap(), Some(session("alice")));
    }

    #[tokio::test]
    async fn test_watch_mirrors_changes_into_cache() {
        let provider = FakeProvider::new(false);
        *provider.changes.lock().unwrap() =
            vec![Some(session("carol")), None, Some(session("dave"))];
        let cache = Arc::new(FakeCache::default());
        let manager = SessionManager::new(Arc::new(provider), cache.clone());

        manager.watch_session_changes().await;

        assert_eq!(manager.current().await, Some(session("dave")));
        assert_eq!(*cache.slot.lock().unwrap(), Some(session("dave")));
    }
}
