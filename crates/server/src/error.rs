// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown, expired, evicted, or already-consumed job id.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Download attempted before the job reached a terminal state.
    #[error("Job not ready (status: {0})")]
    JobNotReady(&'static str),

    /// The generation service reported a failure; carries its message.
    #[error("Generation failed: {0}")]
    JobFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::JobNotFound(id) => {
                tracing::warn!(job_id = %id, "Job not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Job not found", format!("Job ID: {}", id)),
                )
            }
            ApiError::JobNotReady(current) => {
                tracing::debug!(status = %current, "Job not ready for download");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::with_details("Job not ready", format!("status: {}", current)),
                )
            }
            ApiError::JobFailed(message) => {
                tracing::warn!(error = %message, "Job failed upstream");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::with_details("Generation failed", message.clone()),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    /// Helper to extract status code and body from a response
    async fn extract_response(response: Response) -> (StatusCode, ErrorResponse) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_job_not_found_returns_404() {
        let error = ApiError::JobNotFound("abc123".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Job not found");
        assert!(body.details.unwrap().contains("abc123"));
    }

    #[tokio::test]
    async fn test_job_not_ready_returns_409_with_status() {
        let error = ApiError::JobNotReady("generating");
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Job not ready");
        assert_eq!(body.details.unwrap(), "status: generating");
    }

    #[tokio::test]
    async fn test_job_failed_returns_502_with_message() {
        let error = ApiError::JobFailed("API quota exceeded: slow down".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Generation failed");
        assert!(body.details.unwrap().contains("quota"));
    }

    #[tokio::test]
    async fn test_bad_request_returns_400() {
        let error = ApiError::BadRequest("unsupported aspect ratio: 4:5".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Bad request");
        assert!(body.details.unwrap().contains("4:5"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let error = ApiError::Internal("mutex drama".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        // Internal errors should NOT expose details to clients
        assert!(body.details.is_none());
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("Test error");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
        assert!(!json.contains("details")); // None should be skipped

        let response = ErrorResponse::with_details("Test error", "More info");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\":\"More info\""));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::JobNotFound("test-id".to_string());
        assert_eq!(err.to_string(), "Job not found: test-id");

        let err = ApiError::JobNotReady("queued");
        assert_eq!(err.to_string(), "Job not ready (status: queued)");

        let err = ApiError::JobFailed("oops".to_string());
        assert_eq!(err.to_string(), "Generation failed: oops");
    }
}
