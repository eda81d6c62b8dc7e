// crates/core/src/lib.rs
//! Blueprint core library.
//!
//! This crate holds everything that is independent of the HTTP server:
//! the prompt builder that turns a plain diagram description into a
//! model-ready prompt, and the image generation layer (the
//! [`gen::ImageGenerator`] trait plus the Gemini implementation).

pub mod gen;
pub mod prompt;

pub use gen::{GeminiGenerator, GeneratedImage, GenerationError, GenerationRequest, ImageGenerator};
pub use prompt::{build_prompt, AspectRatio, DiagramType, Resolution};
