//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use idea_ranker_core::{IdeaService, SessionManager};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ideas: IdeaService,
    pub sessions: Arc<SessionManager>,
}
