//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the idea endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{submit_error_response, HandlerError};
use crate::web::auth::{self, SessionResponse};
use crate::web::state::AppState;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use idea_ranker_core::{IdeaDraft, RankedIdea, Scores, Session};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

/// Sub-scores are sliders from 0 to 100.
pub const MAX_SCORE: u8 = 100;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_ideas_handler,
        create_idea_handler,
        auth::current_session_handler,
        auth::sign_in_handler,
        auth::sign_out_handler,
    ),
    components(
        schemas(CreateIdeaRequest, IdeaResponse, SessionResponse)
    ),
    tags(
        (name = "Idea Ranker API", description = "Record ideas and list them ranked by rating.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The entry form as submitted by the front-end. Missing fields take their
/// untouched-form defaults.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateIdeaRequest {
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub simplicity: u8,
    pub practicality: u8,
    pub appeal: u8,
    #[serde(alias = "gutfeeling")]
    pub gut_feeling: u8,
}

impl CreateIdeaRequest {
    fn into_draft(self) -> Result<IdeaDraft, HandlerError> {
        let scores = Scores::new(
            self.simplicity,
            self.practicality,
            self.appeal,
            self.gut_feeling,
        );
        let in_range = [
            scores.simplicity,
            scores.practicality,
            scores.appeal,
            scores.gut_feeling,
        ]
        .iter()
        .all(|&score| score <= MAX_SCORE);
        if !in_range {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Scores must be between 0 and {}.", MAX_SCORE),
            ));
        }

        Ok(IdeaDraft {
            title: self.title,
            short_description: self.short_description,
            full_description: self.full_description,
            scores,
        })
    }
}

/// One row of the ranked list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponse {
    /// 1-based position in the ranked list.
    pub position: usize,
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub simplicity: u8,
    pub practicality: u8,
    pub appeal: u8,
    pub gut_feeling: u8,
    pub rating: f64,
    /// Whether the list view should flag the idea.
    pub hot: bool,
    /// The number shown beside the idea; `null` past the fifth entry.
    pub display_position: Option<usize>,
    /// The rating with one decimal, or "Not rated yet" at zero.
    pub rating_label: String,
}

impl From<RankedIdea> for IdeaResponse {
    fn from(ranked: RankedIdea) -> Self {
        let hot = ranked.is_hot();
        let display_position = ranked.display_position();
        let rating_label = ranked.rating_label();
        let idea = ranked.idea;
        Self {
            position: ranked.position,
            id: idea.id,
            title: idea.title,
            short_description: idea.short_description,
            full_description: idea.full_description,
            simplicity: idea.scores.simplicity,
            practicality: idea.scores.practicality,
            appeal: idea.scores.appeal,
            gut_feeling: idea.scores.gut_feeling,
            rating: idea.rating,
            hot,
            display_position,
            rating_label,
        }
    }
}

fn to_responses(ranked: Vec<RankedIdea>) -> Vec<IdeaResponse> {
    ranked.into_iter().map(IdeaResponse::from).collect()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> &'static str {
    "ok"
}

/// List the signed-in user's ideas, highest rating first.
///
/// A failing store yields an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/ideas",
    responses(
        (status = 200, description = "Ranked ideas", body = [IdeaResponse]),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_ideas_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<Vec<IdeaResponse>> {
    Json(to_responses(app_state.ideas.fetch(&session).await))
}

/// Submit a new idea and get back the re-ranked list.
#[utoipa::path(
    post,
    path = "/ideas",
    request_body = CreateIdeaRequest,
    responses(
        (
            status = 201,
            description = "Idea saved; body is the ranked list including it",
            body = [IdeaResponse]
        ),
        (status = 401, description = "Not signed in"),
        (
            status = 422,
            description = "Nothing entered, required fields missing, or scores out of range"
        ),
        (status = 502, description = "The store could not save the idea")
    )
)]
pub async fn create_idea_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(request): Json<CreateIdeaRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let draft = request.into_draft()?;
    let ranked = app_state
        .ideas
        .submit(&session, draft)
        .await
        .map_err(submit_error_response)?;
    info!("{} now has {} ideas", session.uid, ranked.len());

    Ok((StatusCode::CREATED, Json(to_responses(ranked))))
}
