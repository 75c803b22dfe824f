//! Job management split into focused submodules.
//!
//! The `JobManager` struct and its methods are organized by concern:
//! - [`registry`] - In-memory job records
//! - [`transitions`] - The job state machine
//! - [`executor`] - Background execution of one job
//! - [`lifecycle`] - Shutdown coordination
//! - [`retention`] - Optional eviction of finished jobs

mod executor;
mod lifecycle;
mod registry;
mod retention;
mod transitions;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use executor::{GENERIC_MESSAGE, TIMEOUT_MESSAGE};
pub use registry::JobRegistry;
pub use transitions::{PROGRESS_DONE, PROGRESS_INVOKING, PROGRESS_PROCESSING};

use crate::config::Config;
use crate::error::{Error, JobError, Result};
use crate::fetcher::{CommandRunner, MediaTool, runner_from_config};
use crate::types::{
    CompletedArtifact, Job, JobId, JobRequest, JobStatus, JobStatusResponse, VideoDetails,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Owner of the job registry and the background executors
///
/// Cloneable: all fields are shared handles, so handlers and executor tasks
/// work against the same registry.
#[derive(Clone)]
pub struct JobManager {
    /// Job records
    pub(crate) registry: JobRegistry,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// External media tool
    pub(crate) tool: MediaTool,
    /// Running executor tasks
    pub(crate) tasks: TaskTracker,
    /// Flag to indicate whether new jobs are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
    /// Cancelled on shutdown to stop background services
    pub(crate) shutdown_token: CancellationToken,
}

impl JobManager {
    /// Create a manager using the yt-dlp binary described by `config.tools`
    ///
    /// Creates the download directory if it does not exist.
    pub async fn new(config: Config) -> Result<Self> {
        let runner = runner_from_config(&config.tools);
        Self::with_runner(config, runner).await
    }

    /// Create a manager around an explicit runner
    pub async fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        tokio::fs::create_dir_all(config.download_dir())
            .await
            .map_err(|e| Error::Config {
                message: format!(
                    "cannot create download directory {}: {}",
                    config.download_dir().display(),
                    e
                ),
                key: Some("download_dir".into()),
            })?;

        let tool = MediaTool::new(runner, &config.tools);
        tracing::info!(
            download_dir = %config.download_dir().display(),
            runner = tool.runner_name(),
            "job manager ready"
        );

        Ok(Self {
            registry: JobRegistry::new(),
            config: Arc::new(config),
            tool,
            tasks: TaskTracker::new(),
            accepting_new: Arc::new(AtomicBool::new(true)),
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Configuration this manager runs with
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Register a job and start executing it in the background
    ///
    /// The record exists in the `starting` state before this returns.
    ///
    /// # Errors
    ///
    /// [`Error::ShuttingDown`] once shutdown has begun.
    pub async fn submit(&self, request: JobRequest) -> Result<JobId> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let id = JobId::new();
        self.registry.insert(Job::new(id)).await;
        tracing::info!(job_id = %id, url = %request.url, format = %request.format_type, "job accepted");

        let manager = self.clone();
        self.tasks.spawn(async move {
            manager.run_job(id, request).await;
        });

        Ok(id)
    }

    /// Snapshot of a job record
    pub async fn job(&self, id: JobId) -> Option<Job> {
        self.registry.get(id).await
    }

    /// Client view of a job's state
    pub async fn status(&self, id: JobId) -> Result<JobStatusResponse> {
        self.registry
            .get(id)
            .await
            .map(|job| JobStatusResponse::from(&job))
            .ok_or_else(|| JobError::NotFound { id }.into())
    }

    /// Resolve a download handle to the produced file
    ///
    /// # Errors
    ///
    /// [`JobError::NotFound`] for an unknown handle, [`JobError::NotReady`]
    /// unless the job completed, [`JobError::FileMissing`] when the file has
    /// been removed from disk.
    pub async fn download(&self, id: JobId) -> Result<CompletedArtifact> {
        let job = self
            .registry
            .get(id)
            .await
            .ok_or(JobError::NotFound { id })?;

        let (JobStatus::Completed, Some(path), Some(filename)) =
            (job.status, job.output_path, job.filename)
        else {
            return Err(JobError::NotReady {
                id,
                status: job.status,
            }
            .into());
        };

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::warn!(job_id = %id, path = %path.display(), "completed file is missing");
            return Err(JobError::FileMissing { id }.into());
        }

        Ok(CompletedArtifact { path, filename })
    }

    /// Look up metadata for a source URL
    pub async fn lookup(&self, url: &str) -> Result<VideoDetails> {
        self.tool.lookup(url).await.map_err(|e| {
            tracing::warn!(url, error = %e, "metadata lookup failed");
            Error::Lookup(e)
        })
    }

    /// Number of jobs currently known
    pub async fn job_count(&self) -> usize {
        self.registry.len().await
    }
}
