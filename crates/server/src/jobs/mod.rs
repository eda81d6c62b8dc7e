// crates/server/src/jobs/mod.rs
//! Asynchronous job lifecycle for diagram generation.
//!
//! A submission creates a [`types::JobRecord`] in the [`store::JobStore`],
//! spawns one generation task via [`runner::spawn_generation`], and hands
//! the caller an opaque id. The caller polls [`report::describe`] and
//! finally consumes the artifact through [`store::JobStore::consume`],
//! which removes the record in the same critical section.

pub mod report;
pub mod runner;
pub mod store;
pub mod types;

pub use report::describe;
pub use runner::spawn_generation;
pub use store::{DownloadOutcome, JobStore, StoreError};
pub use types::{new_job_id, CompletedImage, JobId, JobRecord, JobResult, JobStatus};
