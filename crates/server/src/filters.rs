//! Protocol-version header filters.
//!
//! Two filters wrap every route: the check rejects requests without an
//! acceptable `Tus-Resumable` value before any handler runs, and the stamp
//! injects the current version into every non-OPTIONS response, including
//! the check's own rejections. OPTIONS is exempt from both so capability
//! discovery works version-blind.

use crate::error::ErrorBody;
use axum::Json;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hoist_core::protocol;

/// Reject requests whose `Tus-Resumable` is missing (400) or unsupported (412).
pub async fn require_tus_version(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(version) = req
        .headers()
        .get(protocol::TUS_RESUMABLE)
        .and_then(|v| v.to_str().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Tus-Resumable header is missing".to_string(),
            }),
        )
            .into_response();
    };

    if !protocol::is_supported_version(version) {
        tracing::debug!(version, "unsupported tus version");
        return (
            StatusCode::PRECONDITION_FAILED,
            Json(ErrorBody {
                message: "tus version not supported".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}

/// Stamp `Tus-Resumable: 1.0.0` on every non-OPTIONS response.
pub async fn stamp_tus_version(req: Request, next: Next) -> Response {
    let is_options = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if !is_options {
        response.headers_mut().insert(
            protocol::TUS_RESUMABLE,
            HeaderValue::from_static(protocol::PROTOCOL_VERSION),
        );
    }
    response
}
