// crates/server/src/routes/mod.rs
//! API route handlers for the blueprint server.

pub mod health;
pub mod jobs;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - POST /api/jobs - Submit a generation job, returns the job id
/// - GET  /api/jobs/{id} - Progress message for a job
/// - GET  /api/jobs/{id}/download - One-time download of the artifact
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", jobs::router())
        .with_state(state)
}
