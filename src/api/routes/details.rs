//! Metadata lookup handler.

use crate::api::AppState;
use crate::types::InfoRequest;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /video-details - Resolve title, artist, thumbnail and quality ladder
#[utoipa::path(
    post,
    path = "/video-details",
    tag = "details",
    request_body = crate::types::InfoRequest,
    responses(
        (status = 200, description = "Metadata for the URL", body = crate::types::VideoDetails),
        (status = 400, description = "Could not retrieve video information", body = crate::error::ApiError),
        (status = 500, description = "yt-dlp is not available", body = crate::error::ApiError)
    )
)]
pub async fn video_details(
    State(state): State<AppState>,
    Json(request): Json<InfoRequest>,
) -> Response {
    match state.manager.lookup(&request.url).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => e.into_response(),
    }
}
