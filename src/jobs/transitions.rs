//! Job state machine: `starting → processing → completed | failed`.

use crate::error::JobError;
use crate::types::{Job, JobStatus};
use chrono::Utc;
use std::path::PathBuf;

/// Progress reported once the background task has picked the job up
pub const PROGRESS_PROCESSING: u8 = 10;
/// Progress reported right before the external tool is started
pub const PROGRESS_INVOKING: u8 = 50;
/// Progress of a completed job
pub const PROGRESS_DONE: u8 = 100;

impl Job {
    fn transition_error(&self, to: JobStatus) -> JobError {
        JobError::InvalidTransition {
            id: self.id,
            from: self.status,
            to,
        }
    }

    /// `starting → processing`, progress 10
    pub fn mark_processing(&mut self) -> Result<(), JobError> {
        if self.status != JobStatus::Starting {
            return Err(self.transition_error(JobStatus::Processing));
        }
        self.status = JobStatus::Processing;
        self.progress = PROGRESS_PROCESSING;
        Ok(())
    }

    /// Raise progress while processing
    ///
    /// Progress never decreases and stays below 100 until completion.
    pub fn advance_progress(&mut self, progress: u8) -> Result<(), JobError> {
        if self.status != JobStatus::Processing {
            return Err(self.transition_error(JobStatus::Processing));
        }
        self.progress = self.progress.max(progress.min(PROGRESS_DONE - 1));
        Ok(())
    }

    /// `processing → completed`, progress 100
    ///
    /// The job's own id becomes its download handle.
    pub fn complete(&mut self, output_path: PathBuf, filename: String) -> Result<(), JobError> {
        if self.status != JobStatus::Processing {
            return Err(self.transition_error(JobStatus::Completed));
        }
        self.status = JobStatus::Completed;
        self.progress = PROGRESS_DONE;
        self.download_handle = Some(self.id);
        self.output_path = Some(output_path);
        self.filename = Some(filename);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// `processing → failed`
    ///
    /// Progress is left where the job stopped.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobError> {
        if self.status != JobStatus::Processing {
            return Err(self.transition_error(JobStatus::Failed));
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}
