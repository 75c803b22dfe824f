//! Core types for media-jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a job
///
/// Random (UUID v4) so that it can double as the download handle handed to
/// clients without being guessable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random JobId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Job status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, background task not yet running
    Starting,
    /// Background task running
    Processing,
    /// File produced and ready for download
    Completed,
    /// Failed with error
    Failed,
}

impl JobStatus {
    /// Whether no further transition can leave this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Lowercase name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Starting => "starting",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested output kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Video with audio, muxed into mp4
    Video,
    /// Audio only, transcoded to mp3
    Audio,
}

impl FormatKind {
    /// File extension (without dot) of the produced file
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Video => "mp4",
            FormatKind::Audio => "mp3",
        }
    }
}

impl std::str::FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(FormatKind::Video),
            "audio" => Ok(FormatKind::Audio),
            other => Err(other.to_string()),
        }
    }
}

/// Body of `POST /start-processing`
///
/// `format_type` is kept as a plain string: an unsupported kind is reported
/// through the job's failure state rather than rejected at submission.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobRequest {
    /// Source URL
    pub url: String,
    /// "video" or "audio"
    pub format_type: String,
    /// Quality ceiling such as "720p" (video only; "best" or absent means no ceiling)
    #[serde(default)]
    pub quality: Option<String>,
    /// Track title supplied by the caller
    pub title: String,
    /// Artist label supplied by the caller
    pub artist: String,
}

/// Body of `POST /video-details`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InfoRequest {
    /// Source URL
    pub url: String,
}

/// Response of `POST /start-processing`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StartJobResponse {
    /// Identifier to poll with
    pub job_id: JobId,
}

/// Metadata resolved for a source URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoDetails {
    /// Track title, or the generic title
    pub title: String,
    /// Thumbnail URL (empty when unknown)
    pub thumbnail: String,
    /// Artist, or the uploader
    pub uploader: String,
    /// Quality ladder, "best" first
    pub formats: Vec<String>,
}

/// A job record held in the registry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier
    pub id: JobId,
    /// Current status
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Handle for `GET /download/{handle}` (set on completion)
    pub download_handle: Option<JobId>,
    /// Failure reason shown to the client (set on failure)
    pub error_message: Option<String>,
    /// Server-local path of the produced file (set on completion)
    pub output_path: Option<PathBuf>,
    /// Client-facing filename (set on completion)
    pub filename: Option<String>,
    /// When the job was accepted
    pub created_at: DateTime<Utc>,
    /// When the job reached a terminal state
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a record in the `starting` state
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Starting,
            progress: 0,
            download_handle: None,
            error_message: None,
            output_path: None,
            filename: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Response of `GET /status/{job_id}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobStatusResponse {
    /// Current status
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Download handle, once completed
    pub download_url: Option<String>,
    /// Failure reason, once failed
    pub error_message: Option<String>,
}

impl From<&Job> for JobStatusResponse {
    fn from(job: &Job) -> Self {
        Self {
            status: job.status,
            progress: job.progress,
            download_url: job.download_handle.map(|h| h.to_string()),
            error_message: job.error_message.clone(),
        }
    }
}

/// A finished file ready to be streamed to the client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedArtifact {
    /// Server-local path
    pub path: PathBuf,
    /// Name presented to the client
    pub filename: String,
}
