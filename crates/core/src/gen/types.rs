// crates/core/src/gen/types.rs
//! Request/response/error types for image generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::prompt::{AspectRatio, Resolution};

/// A single generation request, fully resolved (prompt already built).
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    /// Prefix for the generated file name, e.g. `diagram_architecture`.
    pub filename_prefix: String,
    /// Directory the generator writes its scratch PNG into. The caller
    /// owns the file afterwards (and is expected to delete it).
    pub output_dir: PathBuf,
}

/// A successfully generated image, written to disk by the generator.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Errors from the generation service boundary.
///
/// The sub-kinds exist so callers get a recognizable human-readable
/// message; the job core stores the `Display` output verbatim and never
/// re-interprets it.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Billing required: {0}")]
    BillingRequired(String),

    #[error("No image data in response")]
    EmptyResponse,

    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode image data: {0}")]
    Decode(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generation failed: {0}")]
    Other(String),
}
