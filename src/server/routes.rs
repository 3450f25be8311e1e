use crate::analysis::AnalysisContext;
use crate::facts::{RequestTracker, TimeRange};
use crate::server::{AnalyzeSuccess, ApiError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOG_TARGET: &str = "server";

pub type AppState = Arc<AnalysisContext>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub repo_url: String,
    #[serde(default)]
    pub time_range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Builds the HTTP API around a shared analysis context.
pub fn router(context: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze).fallback(method_not_allowed))
        .route("/api/health", get(health))
        .with_state(context)
}

async fn analyze(
    State(context): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<AnalyzeSuccess, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::debug!(target: LOG_TARGET, "Rejected analyze request body: {rejection}");
        ApiError::invalid_repo_url()
    })?;

    let time_range = request
        .time_range
        .as_deref()
        .map_or_else(TimeRange::default, TimeRange::parse_or_default);

    log::info!(target: LOG_TARGET, "POST /api/analyze {} ({time_range})", request.repo_url);

    let result = context.analyze(&request.repo_url, time_range, RequestTracker::new()).await?;
    Ok(AnalyzeSuccess(result))
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
