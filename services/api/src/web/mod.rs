pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use auth::{current_session_handler, sign_in_handler, sign_out_handler};
pub use middleware::require_session;
pub use rest::{create_idea_handler, health_handler, list_ideas_handler};
use state::AppState;

/// Builds the API router. CORS and the Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/session", get(current_session_handler))
        .route("/session/sign-in", post(sign_in_handler))
        .route("/session/sign-out", post(sign_out_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/ideas", get(list_ideas_handler).post(create_idea_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
