//! API error types.
//!
//! Every non-2xx response with a body carries `{"message": "<phrase>"}`.
//! Several of the phrases are fixed by the protocol, so variant Display
//! strings pass the message through unchanged instead of prefixing it.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("file not found")]
    NotFound,

    #[error("upload-Offset header does not match the current offset")]
    OffsetConflict,

    #[error("file expired")]
    Gone,

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("invalid Content-Type header: expected application/offset+octet-stream")]
    UnsupportedMediaType,

    #[error("{0}")]
    NotImplemented(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("{0}")]
    RequestTimeout(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Core(#[from] hoist_core::Error),

    #[error("internal storage error")]
    Storage(#[from] hoist_storage::StorageError),

    #[error("internal metadata error")]
    Metadata(#[from] hoist_metadata::MetadataError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::OffsetConflict => StatusCode::CONFLICT,
            Self::Gone => StatusCode::GONE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            // 460 is the protocol's checksum-mismatch code; it has no
            // canonical constant.
            Self::ChecksumMismatch => {
                StatusCode::from_u16(460).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
