// crates/server/src/jobs/report.rs
//! Human-facing progress messages for a job.

use chrono::{DateTime, Utc};

use super::types::{JobRecord, JobStatus};

/// Project a record (or its absence) into a progress message.
///
/// Pure read-only view: no mutation, no clock access — `now` comes from
/// the caller so the projection is deterministic under test.
pub fn describe(record: Option<&JobRecord>, now: DateTime<Utc>) -> String {
    let Some(record) = record else {
        return "Job not found".to_string();
    };

    let elapsed = (now - record.created).num_seconds();
    match record.status {
        JobStatus::Queued => format!("Queued ({elapsed}s elapsed)"),
        JobStatus::Generating => format!("Generating ({elapsed}s elapsed, typically 30-60s)"),
        JobStatus::Complete => format!("Complete ({elapsed}s) - Ready to download"),
        JobStatus::Failed => format!(
            "Failed: {}",
            record.failure_message().unwrap_or("Unknown")
        ),
    }
}
