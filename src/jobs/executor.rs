//! Background execution of a single job.

use super::JobManager;
use super::transitions::PROGRESS_INVOKING;
use crate::error::{Error, ToolError};
use crate::fetcher::{FetchPlan, last_diagnostic_line, validate_url};
use crate::sanitize::presented_filename;
use crate::types::{CompletedArtifact, FormatKind, JobId, JobRequest};

/// Client-facing reason when the tool exceeds its time budget
pub const TIMEOUT_MESSAGE: &str = "The process took too long.";
/// Client-facing reason for failures with no better description
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred.";

/// Why a job failed
#[derive(Debug)]
pub(crate) enum JobFailure {
    /// Unsupported format kind or unusable URL; the message is shown as is
    InvalidInput(String),
    /// The external tool failed or timed out
    Tool(ToolError),
    /// Anything else
    Internal(Error),
}

impl From<ToolError> for JobFailure {
    fn from(e: ToolError) -> Self {
        JobFailure::Tool(e)
    }
}

impl From<crate::error::JobError> for JobFailure {
    fn from(e: crate::error::JobError) -> Self {
        JobFailure::Internal(e.into())
    }
}

/// Reason stored on the job record for `failure`
pub(crate) fn failure_message(failure: &JobFailure) -> String {
    match failure {
        JobFailure::InvalidInput(message) => message.clone(),
        JobFailure::Tool(ToolError::Timeout { .. }) => TIMEOUT_MESSAGE.to_string(),
        JobFailure::Tool(ToolError::Failed { stderr, .. }) => {
            last_diagnostic_line(stderr).unwrap_or_else(|| GENERIC_MESSAGE.to_string())
        }
        JobFailure::Tool(_) | JobFailure::Internal(_) => GENERIC_MESSAGE.to_string(),
    }
}

impl JobManager {
    /// Drive one job to a terminal state
    ///
    /// Never returns an error: every failure after the job has started
    /// processing ends up on the job record.
    pub(crate) async fn run_job(&self, id: JobId, request: JobRequest) {
        if let Err(e) = self.registry.update(id, |job| job.mark_processing()).await {
            tracing::error!(job_id = %id, error = %e, "job could not start processing");
            return;
        }
        tracing::debug!(job_id = %id, url = %request.url, format = %request.format_type, "job processing");

        match self.execute(id, &request).await {
            Ok(artifact) => {
                tracing::info!(
                    job_id = %id,
                    filename = %artifact.filename,
                    path = %artifact.path.display(),
                    "job completed"
                );
                let CompletedArtifact { path, filename } = artifact;
                if let Err(e) = self
                    .registry
                    .update(id, |job| job.complete(path, filename))
                    .await
                {
                    tracing::warn!(job_id = %id, error = %e, "could not record completion");
                }
            }
            Err(failure) => {
                let message = failure_message(&failure);
                match &failure {
                    JobFailure::InvalidInput(_) => {
                        tracing::warn!(job_id = %id, reason = %message, "job rejected")
                    }
                    JobFailure::Tool(e) => {
                        tracing::warn!(job_id = %id, error = %e, reason = %message, "job failed")
                    }
                    JobFailure::Internal(e) => {
                        tracing::error!(job_id = %id, error = %e, "job failed unexpectedly")
                    }
                }
                if let Err(e) = self.registry.update(id, |job| job.fail(message)).await {
                    tracing::warn!(job_id = %id, error = %e, "could not record failure");
                }
            }
        }
    }

    async fn execute(
        &self,
        id: JobId,
        request: &JobRequest,
    ) -> Result<CompletedArtifact, JobFailure> {
        let format: FormatKind = request
            .format_type
            .parse()
            .map_err(|kind| JobFailure::InvalidInput(format!("invalid format type: {kind}")))?;
        let url = validate_url(&request.url)
            .map_err(|url| JobFailure::InvalidInput(format!("invalid URL: {url}")))?;

        let path = self
            .config
            .download_dir()
            .join(format!("{}.{}", id, format.extension()));

        self.registry
            .update(id, |job| job.advance_progress(PROGRESS_INVOKING))
            .await?;

        self.tool
            .fetch(&FetchPlan {
                url,
                format,
                quality: request.quality.as_deref(),
                output_path: &path,
            })
            .await?;

        Ok(CompletedArtifact {
            path,
            filename: presented_filename(&request.title, &request.artist, format),
        })
    }
}
