// crates/server/src/routes/jobs.rs
//! Diagram generation job routes.
//!
//! - POST /jobs                — submit a job (202 + job id)
//! - GET  /jobs/{id}           — progress message
//! - GET  /jobs/{id}/download  — one-time artifact download

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use blueprint_core::{build_prompt, AspectRatio, DiagramType, GenerationRequest, Resolution};

use crate::error::{ApiError, ApiResult};
use crate::jobs::{describe, new_job_id, spawn_generation, DownloadOutcome, JobRecord};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Request body for POST /api/jobs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Diagram description with specific components and labels.
    pub description: String,
    /// Type tag: architecture, flowchart, data_flow, sequence,
    /// infographic, generic. Unknown tags fall back to generic.
    #[serde(default)]
    pub diagram_type: Option<String>,
    /// Ratio tag: 1:1, 16:9, 9:16, 4:3, 3:4, 21:9 (default 16:9).
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Resolution tag: 1K or 2K (default 2K).
    #[serde(default)]
    pub resolution: Option<String>,
    /// Override for the scratch directory the image is generated into.
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// Response for POST /api/jobs (202 Accepted).
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Response for GET /api/jobs/{id}.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

/// Response for GET /api/jobs/{id}/download.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
    pub image_base64: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/jobs - Submit a generation job.
///
/// Creates the record, spawns the generation task, and returns the id
/// immediately; the caller never waits on generation.
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    state.store.maintain();

    if request.description.trim().is_empty() {
        return Err(ApiError::BadRequest("description must not be empty".to_string()));
    }

    let diagram_type = DiagramType::parse_or_generic(
        request.diagram_type.as_deref().unwrap_or("generic"),
    );
    let aspect_ratio = match request.aspect_ratio.as_deref() {
        None => AspectRatio::Landscape,
        Some(tag) => tag.parse::<AspectRatio>().map_err(ApiError::BadRequest)?,
    };
    let resolution = match request.resolution.as_deref() {
        None => Resolution::High,
        Some(tag) => tag.parse::<Resolution>().map_err(ApiError::BadRequest)?,
    };

    let id = new_job_id();
    let prompt = build_prompt(&request.description, diagram_type, aspect_ratio, resolution);
    let output_dir = request
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| state.output_dir.clone());

    state
        .store
        .put(JobRecord::new(id.clone(), Utc::now()))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(job_id = %id, diagram_type = %diagram_type, "job submitted");
    spawn_generation(
        Arc::clone(&state.store),
        Arc::clone(&state.generator),
        id.clone(),
        GenerationRequest {
            prompt,
            aspect_ratio,
            resolution,
            filename_prefix: format!("diagram_{diagram_type}"),
            output_dir,
        },
    );

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { job_id: id })))
}

/// GET /api/jobs/{id} - Progress message for a job.
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    state.store.maintain();

    let record = state.store.get(&id).ok_or(ApiError::JobNotFound(id))?;
    let message = describe(Some(&record), Utc::now());
    Ok(Json(StatusResponse {
        job_id: record.id.clone(),
        status: record.status.as_str().to_string(),
        message,
    }))
}

/// GET /api/jobs/{id}/download - One-time download of the artifact.
///
/// Consuming: on success the record is removed in the same critical
/// section, so a second request for the same id gets a 404.
pub async fn download_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DownloadResponse>> {
    match state.store.consume(&id) {
        DownloadOutcome::Ready(image) => Ok(Json(DownloadResponse {
            filename: image.filename,
            width: image.width,
            height: image.height,
            model: image.model,
            image_base64: BASE64.encode(&image.bytes),
        })),
        DownloadOutcome::NotReady(status) => Err(ApiError::JobNotReady(status.as_str())),
        DownloadOutcome::Failed(message) => Err(ApiError::JobFailed(message)),
        DownloadOutcome::NotFound => Err(ApiError::JobNotFound(id)),
    }
}

/// Create the jobs routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", post(submit_job))
        .route("/jobs/{id}", get(job_status))
        .route("/jobs/{id}/download", get(download_job))
}
