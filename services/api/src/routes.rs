use crate::infra::{ApiService, AppState};
use affinity::compatibility::{compatibility_router, EstimatedScore, Profile};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Two inline profiles scored without touching the directory or the stores.
#[derive(Debug, Deserialize)]
pub(crate) struct EstimateRequest {
    pub(crate) a: Profile,
    pub(crate) b: Profile,
}

pub(crate) fn with_compatibility_routes(service: Arc<ApiService>) -> axum::Router {
    compatibility_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/compatibility/estimate",
            axum::routing::post(estimate_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn estimate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> Json<EstimatedScore> {
    let EstimateRequest { a, b } = payload;
    Json(state.estimator.estimate(&a, &b))
}
