use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdfsmith::{ErrorKind, TransformError};
use thiserror::Error;
use tracing::{error, warn};

/// Application-specific error types for the API
#[derive(Debug, Error)]
pub enum AppError {
    /// Failures reported by a transformation
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The multipart stream could not be read, or exceeded the upload limit
    #[error("Failed to read upload: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// The blocking worker panicked or was cancelled
    #[error("Worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Transform(err) => match err.kind() {
                ErrorKind::MissingInput => StatusCode::BAD_REQUEST,
                ErrorKind::AuthenticationFailed => StatusCode::FORBIDDEN,
                ErrorKind::ProcessingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Multipart(err) => err.status(),
            AppError::Worker(_) | AppError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{message}");
        } else {
            warn!(status = status.as_u16(), "{message}");
        }

        (status, message).into_response()
    }
}
