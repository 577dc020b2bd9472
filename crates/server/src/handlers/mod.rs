//! HTTP request handlers.

pub mod capabilities;
pub mod uploads;

pub use capabilities::*;
pub use uploads::*;

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderValue;

/// Build a header value, surfacing invalid bytes as an internal error.
pub(crate) fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Internal(format!("invalid header value: {e}")))
}
