//! In-memory job registry.

use crate::error::JobError;
use crate::types::{Job, JobId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared map of job records keyed by id
///
/// Cloning is cheap and every clone sees the same records. Handlers only read;
/// each record is mutated by the executor task that owns it.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same id
    pub async fn insert(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }

    /// Snapshot of one record
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Apply `f` to the record under the write lock
    pub async fn update<T>(
        &self,
        id: JobId,
        f: impl FnOnce(&mut Job) -> Result<T, JobError>,
    ) -> Result<T, JobError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(JobError::NotFound { id })?;
        f(job)
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Remove and return every terminal record that finished before `cutoff`
    pub async fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> Vec<Job> {
        let mut jobs = self.jobs.write().await;
        let expired: Vec<JobId> = jobs
            .values()
            .filter(|job| job.status.is_terminal())
            .filter(|job| job.finished_at.is_some_and(|t| t < cutoff))
            .map(|job| job.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| jobs.remove(&id))
            .collect()
    }
}
