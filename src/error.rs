//! Error types for media-jobs
//!
//! This module provides error handling for the crate, including:
//! - Domain-specific error types (Job, Tool, Lookup)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use crate::types::{JobId, JobStatus};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-jobs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-jobs
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Job-related error
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Metadata lookup failed
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Job-related errors
#[derive(Debug, Error)]
pub enum JobError {
    /// No job with this id
    #[error("job {id} not found")]
    NotFound {
        /// The job ID that was not found
        id: JobId,
    },

    /// Job exists but has no file to hand out yet
    #[error("job {id} is not ready for download (status: {status})")]
    NotReady {
        /// The job ID
        id: JobId,
        /// Its current status
        status: JobStatus,
    },

    /// Produced file is gone from disk
    #[error("file for job {id} is missing")]
    FileMissing {
        /// The job ID
        id: JobId,
    },

    /// A lifecycle transition that the state machine does not allow
    #[error("cannot move job {id} from {from} to {to}")]
    InvalidTransition {
        /// The job ID
        id: JobId,
        /// State the job is in
        from: JobStatus,
        /// State that was requested
        to: JobStatus,
    },
}

/// Failures of the external media tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool ran past its time budget and was killed
    #[error("timed out after {}s", timeout.as_secs())]
    Timeout {
        /// The budget that was exceeded
        timeout: Duration,
    },

    /// The tool exited unsuccessfully
    #[error("exited with status {}", code.map(|c| c.to_string()).unwrap_or_else(|| "signal".into()))]
    Failed {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured diagnostic output
        stderr: String,
    },

    /// The tool could not be started
    #[error("failed to execute: {0}")]
    Spawn(#[source] std::io::Error),

    /// No binary is configured or on PATH
    #[error("{0} is not available")]
    Unavailable(String),
}

/// Metadata lookup errors
#[derive(Debug, Error)]
pub enum LookupError {
    /// URL is not a valid absolute URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Tool output was not the expected JSON document
    #[error("malformed metadata: {0}")]
    Malformed(String),

    /// The tool ran but failed or timed out
    #[error("{0}")]
    Tool(ToolError),
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "job_not_found",
///     "message": "job error: job 0b5c... not found",
///     "details": {
///       "job_id": "0b5c..."
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "lookup_failed")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Client-facing message for every lookup failure
pub const LOOKUP_FAILED_MESSAGE: &str = "could not retrieve video information";

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,

            // Lookup failures are reported to the client as a bad request,
            // unless the tool itself is missing or could not be started
            Error::Lookup(LookupError::Tool(ToolError::Unavailable(_))) => 500,
            Error::Lookup(LookupError::Tool(ToolError::Spawn(_))) => 500,
            Error::Lookup(_) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,
            Error::Job(JobError::NotFound { .. }) => 404,
            Error::Job(JobError::NotReady { .. }) => 404,
            Error::Job(JobError::FileMissing { .. }) => 404,

            // 409 Conflict
            Error::Job(JobError::InvalidTransition { .. }) => 409,

            // 500 Internal Server Error
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Job(e) => match e {
                JobError::NotFound { .. } => "job_not_found",
                JobError::NotReady { .. } => "job_not_ready",
                JobError::FileMissing { .. } => "file_missing",
                JobError::InvalidTransition { .. } => "invalid_transition",
            },
            Error::Lookup(_) => "lookup_failed",
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();

        // Lookup diagnostics stay in the logs; only the last tool line is exposed
        let message = match &error {
            Error::Lookup(_) => LOOKUP_FAILED_MESSAGE.to_string(),
            _ => error.to_string(),
        };

        let details = match &error {
            Error::Job(JobError::NotFound { id }) => Some(serde_json::json!({
                "job_id": id,
            })),
            Error::Job(JobError::NotReady { id, status }) => Some(serde_json::json!({
                "job_id": id,
                "status": status,
            })),
            Error::Job(JobError::FileMissing { id }) => Some(serde_json::json!({
                "job_id": id,
            })),
            Error::Lookup(LookupError::Tool(ToolError::Failed { stderr, .. })) => {
                crate::fetcher::last_diagnostic_line(stderr)
                    .map(|reason| serde_json::json!({ "reason": reason }))
            }
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
