//! API error responses

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Error;

/// API errors, rendered as `{"error": {"code", "message"}}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    TranscriptionFailed(String),
    CompletionFailed(String),
    SynthesisFailed(String),
    Storage(String),
    Internal(String),
}

impl ApiError {
    /// HTTP status and machine-readable code
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            Self::TranscriptionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "transcription_failed")
            }
            Self::CompletionFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "completion_failed"),
            Self::SynthesisFailed(_) => (StatusCode::BAD_GATEWAY, "synthesis_failed"),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::Transcription(_) => Self::TranscriptionFailed(message),
            Error::Completion(_) => Self::CompletionFailed(message),
            Error::Synthesis(_) => Self::SynthesisFailed(message),
            e if e.is_storage() => Self::Storage(message),
            _ => Self::Internal(message),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code) = self.status_and_code();
        let message = match self {
            Self::BadRequest(msg)
            | Self::PayloadTooLarge(msg)
            | Self::TranscriptionFailed(msg)
            | Self::CompletionFailed(msg)
            | Self::SynthesisFailed(msg)
            | Self::Storage(msg)
            | Self::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!(status = %status, code, message = %message, "request failed");
        }

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}
