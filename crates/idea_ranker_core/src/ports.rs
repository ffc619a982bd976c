//! crates/idea_ranker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the document store, identity provider and local cache.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::{Idea, NewIdea, Session};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Changes the identity provider makes on its own: `Some` when a session appears,
/// `None` when it ends. Results of `sign_in` / `sign_out` calls are not repeated here.
pub type SessionChangeStream = Pin<Box<dyn Stream<Item = Option<Session>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// Persists a new idea for `owner_id` and returns the id the store assigned.
    async fn insert(&self, owner_id: &str, idea: NewIdea) -> PortResult<String>;

    /// Returns every idea owned by `owner_id`, in no particular order.
    async fn query_by_owner(&self, owner_id: &str) -> PortResult<Vec<Idea>>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> PortResult<Session>;

    async fn sign_out(&self) -> PortResult<()>;

    /// Subscribes to session changes that did not come from this caller's
    /// own `sign_in` / `sign_out`.
    fn session_changes(&self) -> SessionChangeStream;
}

/// The single local slot holding the last known signed-in identity.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self) -> PortResult<Option<Session>>;

    async fn set(&self, session: &Session) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}
