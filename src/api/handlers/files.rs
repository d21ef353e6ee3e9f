use crate::AppState;
use crate::api::error::AppError;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use std::time::Instant;

#[utoipa::path(
    get,
    path = "/{file_id}",
    params(
        ("file_id" = String, Path, description = "24-character hex file id")
    ),
    responses(
        (status = 200, description = "Raw object bytes, Content-Type derived from the stored extension"),
        (status = 400, description = "Invalid file id, or the file is not an image or video"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Bucket fetch failed or internal error")
    ),
    tag = "files"
)]
pub async fn stream_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    let started = Instant::now();

    // 1. Validate, look up and type-check the record
    let media = state.media.resolve(&file_id).await?;

    // 2. Open the upstream object. Headers are only committed once this succeeds.
    let object = state.media.open(&media).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, media.content_type.as_ref());

    if let Some(len) = object.content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    // 3. Hand the byte stream to the client as it arrives
    let response = builder
        .body(Body::from_stream(object.body))
        .map_err(|e| AppError::Internal(format!("failed to build response: {}", e)))?;

    tracing::info!(
        file_id = %media.record.id,
        content_type = %media.content_type,
        content_length = ?object.content_length,
        "📦 Streaming {} (upstream ready in {:?})",
        media.object_url,
        started.elapsed()
    );

    Ok(response)
}
