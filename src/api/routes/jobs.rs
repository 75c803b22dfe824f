//! Job handlers: submission, status polling and file download.

use crate::api::AppState;
use crate::error::{Error, JobError};
use crate::types::{JobId, JobRequest, StartJobResponse};
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// Parse a path segment into a job id
///
/// Anything that is not a UUID cannot name a job, so it is reported as not found.
fn parse_job_id(raw: &str) -> Result<JobId, Error> {
    raw.parse()
        .map_err(|_| Error::NotFound(format!("job {raw}")))
}

/// `Content-Disposition` value offering `filename` as an attachment
///
/// Carries an ASCII fallback plus the exact UTF-8 name as `filename*`.
pub(crate) fn content_disposition(filename: &str) -> Result<HeaderValue, Error> {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    ))
    .map_err(|e| Error::Other(format!("invalid Content-Disposition: {e}")))
}

/// POST /start-processing - Submit a job
#[utoipa::path(
    post,
    path = "/start-processing",
    tag = "jobs",
    request_body = crate::types::JobRequest,
    responses(
        (status = 202, description = "Job accepted", body = crate::types::StartJobResponse),
        (status = 503, description = "Server is shutting down", body = crate::error::ApiError)
    )
)]
pub async fn start_processing(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Response {
    match state.manager.submit(request).await {
        Ok(job_id) => (StatusCode::ACCEPTED, Json(StartJobResponse { job_id })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /status/:job_id - Poll a job
#[utoipa::path(
    get,
    path = "/status/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = String, Path, description = "Job ID returned by /start-processing")
    ),
    responses(
        (status = 200, description = "Current job state", body = crate::types::JobStatusResponse),
        (status = 404, description = "Job not found", body = crate::error::ApiError)
    )
)]
pub async fn get_status(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.manager.status(id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /download/:job_id - Stream the produced file
#[utoipa::path(
    get,
    path = "/download/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = String, Path, description = "Download handle from the job status")
    ),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown job, job not completed, or file missing", body = crate::error::ApiError)
    )
)]
pub async fn download_file(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let artifact = match state.manager.download(id).await {
        Ok(artifact) => artifact,
        Err(e) => return e.into_response(),
    };

    let file = match tokio::fs::File::open(&artifact.path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Error::Job(JobError::FileMissing { id }).into_response();
        }
        Err(e) => {
            tracing::error!(job_id = %id, error = %e, "failed to open completed file");
            return Error::Io(e).into_response();
        }
    };

    let disposition = match content_disposition(&artifact.filename) {
        Ok(value) => value,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(job_id = %id, filename = %artifact.filename, "serving file");

    let mut response = Body::from_stream(ReaderStream::new(file)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if let Ok(metadata) = tokio::fs::metadata(&artifact.path).await {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
    }
    response
}
