//! services/api/src/web/middleware.rs
//!
//! Session middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;

/// Middleware that requires a signed-in session.
///
/// If there is one, a copy of the `Session` is inserted into the request
/// extensions for handlers to use. Otherwise returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let session = state.sessions.current().await.ok_or_else(|| {
        debug!("Rejected {} {}: not signed in", req.method(), req.uri().path());
        (StatusCode::UNAUTHORIZED, "Not signed in".to_string())
    })?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
