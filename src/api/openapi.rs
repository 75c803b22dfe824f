//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the media-jobs REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-jobs REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-jobs REST API",
        version = "0.1.0",
        description = "Submit media fetch jobs, poll their status and download the produced files",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Metadata
        crate::api::routes::video_details,

        // Jobs
        crate::api::routes::start_processing,
        crate::api::routes::get_status,
        crate::api::routes::download_file,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::types::JobId,
            crate::types::JobStatus,
            crate::types::FormatKind,
            crate::types::InfoRequest,
            crate::types::VideoDetails,
            crate::types::JobRequest,
            crate::types::StartJobResponse,
            crate::types::JobStatusResponse,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "details", description = "Metadata lookup for source URLs"),
        (name = "jobs", description = "Job submission, status and file download"),
        (name = "system", description = "Health check and API documentation")
    )
)]
pub struct ApiDoc;
