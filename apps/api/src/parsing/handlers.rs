use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::metrics::ParseMetrics;
use crate::state::AppState;

use super::service::{ParseJobResponse, ParseRequest};

/// POST /api/v1/parse
/// Runs a parse job synchronously; job failures come back as a failed job
/// response, not an HTTP error.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseJobResponse>, AppError> {
    if req.file_path.trim().is_empty() {
        return Err(AppError::Validation("file_path must not be empty".to_string()));
    }

    let response = state.parser.parse_resume(req).await;
    Ok(Json(response))
}

/// GET /api/v1/parse/:job_id
pub async fn handle_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ParseJobResponse>, AppError> {
    state
        .parser
        .job_status(&job_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// GET /api/v1/metrics
pub async fn handle_metrics(State(state): State<AppState>) -> Json<ParseMetrics> {
    Json(state.metrics.snapshot())
}
