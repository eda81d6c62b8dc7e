// crates/server/src/jobs/store.rs
//! Bounded, concurrency-safe store of job records.
//!
//! One `Mutex<HashMap>` is the single mutual-exclusion domain for all job
//! state; no component reaches a record any other way. Two maintenance
//! policies bound memory: expiry removes records older than the configured
//! window regardless of status, then capacity eviction drops the oldest
//! completed-but-unretrieved results until the store fits. Maintenance is
//! best-effort housekeeping and never fails a caller operation.
//!
//! No lock is ever held across an `.await`: generation runs on its own
//! task and reaches the store only through [`JobStore::update`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::types::{CompletedImage, JobId, JobRecord, JobResult, JobStatus};

/// Errors from store mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate job id: {0}")]
    DuplicateId(JobId),
}

/// Outcome of the one-time download gate.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The artifact; the record has been consumed and is gone.
    Ready(CompletedImage),
    /// Job exists but has not reached a terminal state. Not consumed.
    NotReady(JobStatus),
    /// Job failed; the stored message. Not consumed (expiry collects it).
    Failed(String),
    /// Unknown, already consumed, or evicted.
    NotFound,
}

/// Bounded concurrent map from job id to record.
pub struct JobStore {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
    /// Maximum record age from creation, any status.
    expiry: Duration,
    /// Record count above which completed jobs are evicted.
    capacity: usize,
}

impl JobStore {
    pub fn new(expiry: Duration, capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            expiry,
            capacity,
        }
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<JobId, JobRecord>> {
        match self.jobs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("job store mutex poisoned; continuing with inner state");
                poisoned.into_inner()
            }
        }
    }

    /// Insert a new record. Ids are minted uniquely, so a collision is a
    /// caller bug surfaced as [`StoreError::DuplicateId`].
    pub fn put(&self, record: JobRecord) -> Result<(), StoreError> {
        let mut jobs = self.locked();
        if jobs.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.clone()));
        }
        jobs.insert(record.id.clone(), record);
        Ok(())
    }

    /// Snapshot of the current record, if present.
    pub fn get(&self, id: &str) -> Option<JobRecord> {
        self.locked().get(id).cloned()
    }

    /// Apply a transition to the record in place, atomically with respect
    /// to every other store operation.
    ///
    /// Returns `false` if the record is gone (expired or evicted), in
    /// which case the write is discarded silently — the runner must not
    /// treat this as an error, and nothing ever recreates the record.
    pub fn update(&self, id: &str, mutate: impl FnOnce(&mut JobRecord)) -> bool {
        let mut jobs = self.locked();
        match jobs.get_mut(id) {
            Some(record) => {
                mutate(record);
                true
            }
            None => false,
        }
    }

    /// Remove a record. Idempotent; returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        self.locked().remove(id).is_some()
    }

    /// Run the maintenance pass: expiry, then capacity eviction.
    pub fn maintain(&self) {
        let mut jobs = self.locked();
        self.sweep(&mut jobs, Utc::now());
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    /// The one-time download gate.
    ///
    /// Runs maintenance and the read-and-remove in a single critical
    /// section: a completed artifact is handed out exactly once, and a
    /// racing second caller observes `NotFound`.
    pub fn consume(&self, id: &str) -> DownloadOutcome {
        let mut jobs = self.locked();
        self.sweep(&mut jobs, Utc::now());

        let status = match jobs.get(id) {
            None => return DownloadOutcome::NotFound,
            Some(record) => record.status,
        };

        match status {
            JobStatus::Queued | JobStatus::Generating => DownloadOutcome::NotReady(status),
            JobStatus::Failed => {
                let message = jobs
                    .get(id)
                    .and_then(|r| r.failure_message())
                    .unwrap_or("Unknown")
                    .to_string();
                DownloadOutcome::Failed(message)
            }
            JobStatus::Complete => match jobs.remove(id).and_then(JobRecord::into_result) {
                Some(JobResult::Success(image)) => {
                    tracing::info!(job_id = %id, "job consumed by download");
                    DownloadOutcome::Ready(image)
                }
                // Unreachable given the transition invariants, but never
                // hand out a terminal record without its artifact.
                _ => DownloadOutcome::NotFound,
            },
        }
    }

    /// Expiry then capacity eviction, under the caller's lock.
    ///
    /// Expiry removes records past the window regardless of status, even
    /// in-flight ones; the runner's later write is then discarded by
    /// `update`. Capacity eviction only ever touches `Complete` records
    /// (oldest `completed` first), so `Queued`/`Generating`/`Failed`
    /// records are bounded by expiry alone.
    fn sweep(&self, jobs: &mut HashMap<JobId, JobRecord>, now: DateTime<Utc>) {
        let cutoff = now - self.expiry;
        let before = jobs.len();
        jobs.retain(|_, record| record.created >= cutoff);
        let expired = before - jobs.len();
        if expired > 0 {
            tracing::debug!(expired, "expired jobs removed");
        }

        if jobs.len() <= self.capacity {
            return;
        }

        let mut completed: Vec<(JobId, DateTime<Utc>)> = jobs
            .values()
            .filter(|record| record.status == JobStatus::Complete)
            .map(|record| (record.id.clone(), record.completed.unwrap_or(record.created)))
            .collect();
        completed.sort_by_key(|(_, completed_at)| *completed_at);

        let excess = jobs.len() - self.capacity;
        for (id, _) in completed.into_iter().take(excess) {
            jobs.remove(&id);
            tracing::debug!(job_id = %id, "evicted completed job over capacity");
        }
    }
}
