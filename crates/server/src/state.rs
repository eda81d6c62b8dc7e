// crates/server/src/state.rs
//! Application state for the Axum server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use blueprint_core::{GeminiGenerator, ImageGenerator};

use crate::config::ServerConfig;
use crate::jobs::JobStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// The single mutual-exclusion domain for all job records.
    pub store: Arc<JobStore>,
    /// Generation backend; one task per job calls into this.
    pub generator: Arc<dyn ImageGenerator>,
    /// Default scratch directory for generated files.
    pub output_dir: PathBuf,
}

impl AppState {
    /// Create the production state from config, wrapped in an Arc for
    /// sharing.
    pub fn new(config: &ServerConfig) -> Arc<Self> {
        Self::with_generator(
            config,
            Arc::new(GeminiGenerator::new(config.google_api_key.clone())),
        )
    }

    /// Create state with an externally-provided generator (for testing).
    pub fn with_generator(config: &ServerConfig, generator: Arc<dyn ImageGenerator>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            store: Arc::new(JobStore::new(config.job_expiry, config.max_jobs)),
            generator,
            output_dir: config.output_dir.clone(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
