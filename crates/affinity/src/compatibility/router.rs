use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PairKey, ProfileId};
use super::service::{CompatibilityService, CompatibilityServiceError};
use super::store::{LocalCache, ProfileProvider, ScoreStore};

/// Body accepted when recording a confirmed analysis.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub score: u8,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Router builder exposing pair views, confirmation and ranked matches.
pub fn compatibility_router<P, S, C>(service: Arc<CompatibilityService<P, S, C>>) -> Router
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    Router::new()
        .route(
            "/api/v1/compatibility/:viewer/:subject",
            get(view_handler::<P, S, C>).delete(invalidate_handler::<P, S, C>),
        )
        .route(
            "/api/v1/compatibility/:viewer/:subject/confirmed",
            post(confirm_handler::<P, S, C>),
        )
        .route(
            "/api/v1/profiles/:viewer/matches",
            get(matches_handler::<P, S, C>),
        )
        .with_state(service)
}

pub(crate) async fn view_handler<P, S, C>(
    State(service): State<Arc<CompatibilityService<P, S, C>>>,
    Path((viewer, subject)): Path<(String, String)>,
) -> Response
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    match service.view_by_id(&ProfileId(viewer), &ProfileId(subject)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn confirm_handler<P, S, C>(
    State(service): State<Arc<CompatibilityService<P, S, C>>>,
    Path((viewer, subject)): Path<(String, String)>,
    axum::Json(request): axum::Json<ConfirmRequest>,
) -> Response
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    match service.confirm_by_id(
        &ProfileId(viewer),
        &ProfileId(subject),
        request.score,
        request.explanation,
    ) {
        Ok(result) => (StatusCode::CREATED, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn invalidate_handler<P, S, C>(
    State(service): State<Arc<CompatibilityService<P, S, C>>>,
    Path((viewer, subject)): Path<(String, String)>,
) -> Response
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    let pair = PairKey::new(&ProfileId(viewer), &ProfileId(subject));
    match service.invalidate(&pair) {
        Ok(existed) => {
            let payload = json!({
                "pair": pair,
                "invalidated": existed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn matches_handler<P, S, C>(
    State(service): State<Arc<CompatibilityService<P, S, C>>>,
    Path(viewer): Path<String>,
    Query(query): Query<MatchesQuery>,
) -> Response
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    match service.rank_for(&ProfileId(viewer), query.limit) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: CompatibilityServiceError) -> Response {
    let status = match &err {
        CompatibilityServiceError::ScoreOutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CompatibilityServiceError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        CompatibilityServiceError::Profile(_) | CompatibilityServiceError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
