//! services/api/src/web/auth.rs
//!
//! Session endpoints: who is signed in, sign in, and sign out.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use idea_ranker_core::Session;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{port_error_response, HandlerError};
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// The name to greet the user with.
    pub first_name: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let first_name = session.first_name().to_string();
        Self {
            uid: session.uid,
            display_name: session.display_name,
            email: session.email,
            photo_url: session.photo_url,
            first_name,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /session - The current session, if any
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 204, description = "Nobody is signed in")
    )
)]
pub async fn current_session_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.sessions.current().await {
        Some(session) => (StatusCode::OK, Json(SessionResponse::from(session))).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// POST /session/sign-in - Sign in through the identity provider
#[utoipa::path(
    post,
    path = "/session/sign-in",
    responses(
        (status = 200, description = "Sign-in successful", body = SessionResponse),
        (status = 401, description = "The identity provider refused the sign-in"),
        (status = 502, description = "The identity provider is unavailable")
    )
)]
pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, HandlerError> {
    // Failures are logged by the session manager.
    let session = state
        .sessions
        .sign_in()
        .await
        .map_err(|e| port_error_response(&e))?;
    Ok(Json(session.into()))
}

/// POST /session/sign-out - Sign out and forget the cached session
#[utoipa::path(
    post,
    path = "/session/sign-out",
    responses(
        (status = 204, description = "Signed out"),
        (status = 502, description = "The identity provider is unavailable")
    )
)]
pub async fn sign_out_handler(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HandlerError> {
    state
        .sessions
        .sign_out()
        .await
        .map_err(|e| port_error_response(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
