// crates/core/src/gen/mod.rs
//! Image generation layer.
//!
//! [`ImageGenerator`] is the seam between the job machinery and the actual
//! model call; [`GeminiGenerator`] is the production implementation.

pub mod gemini;
pub mod provider;
pub mod types;

pub use gemini::GeminiGenerator;
pub use provider::ImageGenerator;
pub use types::{GeneratedImage, GenerationError, GenerationRequest};
