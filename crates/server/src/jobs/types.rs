// crates/server/src/jobs/types.rs
//! Types for the background job system.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Opaque unique identifier for a job, assigned at submission.
pub type JobId = String;

/// Mint a fresh job id. Ids are random UUIDs and are never reused.
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4().to_string()
}

/// Status of a generation job.
///
/// Transitions are monotonic along `Queued → Generating → (Complete |
/// Failed)`; the two terminal states accept no further writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Generating,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Generating => "generating",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Terminal outcome of a job.
#[derive(Debug, Clone)]
pub enum JobResult {
    Success(CompletedImage),
    Failure { message: String },
}

/// The finished artifact, held in memory until downloaded or evicted.
#[derive(Debug, Clone)]
pub struct CompletedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub model: String,
    pub filename: String,
}

/// One tracked job from submission to terminal state or removal.
///
/// `result` is private: the only writes are [`JobRecord::begin_generating`]
/// and [`JobRecord::finish`], which keep `result` present iff the status is
/// terminal and ignore writes that would move a terminal job backwards.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub created: DateTime<Utc>,
    pub started: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    result: Option<JobResult>,
}

impl JobRecord {
    /// Create a freshly queued record.
    pub fn new(id: JobId, created: DateTime<Utc>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            created,
            started: None,
            completed: None,
            result: None,
        }
    }

    /// Transition `Queued → Generating`, recording the start time.
    ///
    /// A no-op on any other status; transitions never move backwards.
    pub fn begin_generating(&mut self, now: DateTime<Utc>) {
        if self.status == JobStatus::Queued {
            self.status = JobStatus::Generating;
            self.started = Some(now);
        }
    }

    /// Transition to the terminal state for `result`, atomically setting
    /// `completed` and `result` with the status.
    ///
    /// A no-op if the job is already terminal: exactly one terminal write
    /// sticks per job.
    pub fn finish(&mut self, result: JobResult, now: DateTime<Utc>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = match result {
            JobResult::Success(_) => JobStatus::Complete,
            JobResult::Failure { .. } => JobStatus::Failed,
        };
        self.completed = Some(now);
        self.result = Some(result);
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<JobResult> {
        self.result
    }

    /// The stored failure message, if this job failed.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.result {
            Some(JobResult::Failure { message }) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> JobResult {
        JobResult::Success(CompletedImage {
            bytes: vec![1, 2, 3],
            width: 4,
            height: 2,
            model: "test-model".to_string(),
            filename: "diagram.png".to_string(),
        })
    }

    #[test]
    fn test_new_record_is_queued_without_result() {
        let record = JobRecord::new(new_job_id(), Utc::now());
        assert_eq!(record.status, JobStatus::Queued);
        assert!(record.started.is_none());
        assert!(record.completed.is_none());
        assert!(record.result().is_none());
    }

    #[test]
    fn test_lifecycle_success() {
        let mut record = JobRecord::new(new_job_id(), Utc::now());

        record.begin_generating(Utc::now());
        assert_eq!(record.status, JobStatus::Generating);
        assert!(record.started.is_some());
        assert!(record.result().is_none());

        record.finish(success(), Utc::now());
        assert_eq!(record.status, JobStatus::Complete);
        assert!(record.completed.is_some());
        assert!(matches!(record.result(), Some(JobResult::Success(_))));
    }

    #[test]
    fn test_lifecycle_failure_keeps_message() {
        let mut record = JobRecord::new(new_job_id(), Utc::now());
        record.begin_generating(Utc::now());
        record.finish(
            JobResult::Failure {
                message: "API quota exceeded: out of tokens".to_string(),
            },
            Utc::now(),
        );

        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(
            record.failure_message(),
            Some("API quota exceeded: out of tokens")
        );
    }

    #[test]
    fn test_terminal_states_reject_further_writes() {
        let mut record = JobRecord::new(new_job_id(), Utc::now());
        record.begin_generating(Utc::now());
        record.finish(success(), Utc::now());
        let completed_at = record.completed;

        // Second terminal write is discarded.
        record.finish(
            JobResult::Failure {
                message: "late failure".to_string(),
            },
            Utc::now(),
        );
        assert_eq!(record.status, JobStatus::Complete);
        assert_eq!(record.completed, completed_at);
        assert!(record.failure_message().is_none());

        // And a backwards transition is ignored.
        record.begin_generating(Utc::now());
        assert_eq!(record.status, JobStatus::Complete);
    }

    #[test]
    fn test_result_present_iff_terminal() {
        let mut record = JobRecord::new(new_job_id(), Utc::now());
        assert!(!record.status.is_terminal());
        assert!(record.result().is_none());

        record.begin_generating(Utc::now());
        assert!(!record.status.is_terminal());
        assert!(record.result().is_none());

        record.finish(success(), Utc::now());
        assert!(record.status.is_terminal());
        assert!(record.result().is_some());
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(JobStatus::Queued.as_str(), "queued");
        assert_eq!(JobStatus::Generating.as_str(), "generating");
        assert_eq!(JobStatus::Complete.as_str(), "complete");
        assert_eq!(JobStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_job_ids_are_unique() {
        let a = new_job_id();
        let b = new_job_id();
        assert_ne!(a, b);
    }
}
