//! services/api/src/adapters/memory.rs
//!
//! An `IdeaStore` kept in process memory. Used when no `DATABASE_URL` is
//! configured, and by the router tests.

use async_trait::async_trait;
use idea_ranker_core::domain::{Idea, NewIdea};
use idea_ranker_core::ports::{IdeaStore, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryIdeaStore {
    ideas: RwLock<Vec<Idea>>,
}

impl InMemoryIdeaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdeaStore for InMemoryIdeaStore {
    async fn insert(&self, owner_id: &str, idea: NewIdea) -> PortResult<String> {
        let id = Uuid::new_v4().to_string();
        self.ideas
            .write()
            .await
            .push(idea.into_idea(id.clone(), owner_id.to_string()));
        Ok(id)
    }

    async fn query_by_owner(&self, owner_id: &str) -> PortResult<Vec<Idea>> {
        Ok(self
            .ideas
            .read()
            .await
            .iter()
            .filter(|idea| idea.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
