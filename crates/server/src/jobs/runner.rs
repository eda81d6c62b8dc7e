// crates/server/src/jobs/runner.rs
//! One spawned task per generation job.
//!
//! The submitting request handler never waits on generation: it creates
//! the record, calls [`spawn_generation`], and returns. The task makes
//! exactly one terminal write, and every write goes through
//! [`JobStore::update`] so a record that maintenance already removed is
//! discarded silently rather than recreated.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use blueprint_core::{GenerationRequest, ImageGenerator};

use super::store::JobStore;
use super::types::{CompletedImage, JobId, JobResult};

/// Spawn the generation task for a freshly submitted job.
pub fn spawn_generation(
    store: Arc<JobStore>,
    generator: Arc<dyn ImageGenerator>,
    id: JobId,
    request: GenerationRequest,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let started = store.update(&id, |record| record.begin_generating(Utc::now()));
        if !started {
            // Already expired/evicted; nothing can observe this job.
            tracing::debug!(job_id = %id, "job removed before generation started; skipping");
            return;
        }

        let result = run_generation(generator.as_ref(), request).await;
        match &result {
            JobResult::Success(image) => tracing::info!(
                job_id = %id,
                width = image.width,
                height = image.height,
                bytes = image.bytes.len(),
                "generation complete"
            ),
            JobResult::Failure { message } => {
                tracing::warn!(job_id = %id, error = %message, "generation failed")
            }
        }

        let retained = store.update(&id, |record| record.finish(result, Utc::now()));
        if !retained {
            tracing::debug!(job_id = %id, "job evicted during generation; discarding result");
        }
    })
}

/// Run one generation to a terminal [`JobResult`].
///
/// Never retries; any fault along the way (service error, file I/O)
/// becomes the job's failure message.
async fn run_generation(generator: &dyn ImageGenerator, request: GenerationRequest) -> JobResult {
    let image = match generator.generate(request).await {
        Ok(image) => image,
        Err(e) => {
            return JobResult::Failure {
                message: e.to_string(),
            }
        }
    };

    match slurp_and_discard(&image.path).await {
        Ok(bytes) => JobResult::Success(CompletedImage {
            bytes,
            width: image.width,
            height: image.height,
            model: generator.model().to_string(),
            filename: image
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "diagram.png".to_string()),
        }),
        Err(e) => JobResult::Failure {
            message: e.to_string(),
        },
    }
}

/// Read the scratch file fully into memory, then delete it. The artifact
/// lives only in the store from here on.
async fn slurp_and_discard(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    tokio::fs::remove_file(path).await?;
    Ok(bytes)
}
