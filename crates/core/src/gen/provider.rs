// crates/core/src/gen/provider.rs
//! ImageGenerator trait defining the interface to the generation service.

use async_trait::async_trait;

use super::types::{GeneratedImage, GenerationError, GenerationRequest};

/// Trait for backends that can turn a prompt into a diagram image.
///
/// Implementations include:
/// - `GeminiGenerator` — calls the Gemini image API over HTTP
/// - Test doubles that return canned images or failures
///
/// The call may take arbitrarily long; callers are expected to run it on
/// their own task, never on a request path. No retries happen here.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and write it into `request.output_dir`.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedImage, GenerationError>;

    /// Model identifier for result metadata and logging.
    fn model(&self) -> &str;
}
