use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid file ID: {0:?}")]
    InvalidIdentifier(String),

    #[error("No file record for {0}")]
    NotFound(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) | AppError::UnsupportedType(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamFetch(_) | AppError::Internal(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body sent to the caller. Details stay in the server log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "Invalid file ID format",
            AppError::NotFound(_) => "File not found",
            AppError::UnsupportedType(_) => "Requested file is not an image or video",
            AppError::UpstreamFetch(_) => "Error fetching file",
            AppError::Internal(_) | AppError::Anyhow(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamFetch(msg) => {
                tracing::error!("Error fetching file from bucket: {}", msg);
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            AppError::Anyhow(e) => {
                tracing::error!("Anyhow error: {:?}", e);
            }
            other => {
                tracing::debug!("Request rejected: {}", other);
            }
        }

        let status = self.status_code();
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
