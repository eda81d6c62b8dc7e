// crates/server/src/config.rs
//! Server configuration, read once from the environment at startup.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Duration;

/// Default port for the server.
const DEFAULT_PORT: u16 = 47911;
/// Maximum record age before forced expiry, in minutes.
const DEFAULT_JOB_EXPIRY_MINUTES: i64 = 10;
/// Record count above which completed jobs are evicted.
const DEFAULT_MAX_JOBS: usize = 3;

/// Runtime configuration. No hot-reload: values are read once in `main`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Credential for the Gemini image API.
    pub google_api_key: String,
    pub job_expiry: Duration,
    pub max_jobs: usize,
    /// Scratch directory for generated files before they are read into
    /// memory and deleted.
    pub output_dir: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `GOOGLE_API_KEY` is required; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let google_api_key = std::env::var("GOOGLE_API_KEY")
            .context("GOOGLE_API_KEY must be set to reach the generation service")?;

        Ok(Self {
            port: parse_or(std::env::var("BLUEPRINT_PORT").ok()
                .or_else(|| std::env::var("PORT").ok()), DEFAULT_PORT),
            google_api_key,
            job_expiry: Duration::minutes(parse_or(
                std::env::var("BLUEPRINT_JOB_EXPIRY_MINUTES").ok(),
                DEFAULT_JOB_EXPIRY_MINUTES,
            )),
            max_jobs: parse_or(std::env::var("BLUEPRINT_MAX_JOBS").ok(), DEFAULT_MAX_JOBS),
            output_dir: std::env::var("BLUEPRINT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
        })
    }

    /// Configuration for tests: defaults plus a caller-chosen scratch dir.
    pub fn for_tests(output_dir: PathBuf) -> Self {
        Self {
            port: 0,
            google_api_key: "test-key".to_string(),
            job_expiry: Duration::minutes(DEFAULT_JOB_EXPIRY_MINUTES),
            max_jobs: DEFAULT_MAX_JOBS,
            output_dir,
        }
    }
}

/// Parse an optional env value, falling back to the default on absence or
/// garbage. Bad values should never keep the server from starting.
fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
