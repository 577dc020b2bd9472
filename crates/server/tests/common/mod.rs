//! Shared test utilities.

pub mod server;

pub use server::TestServer;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

/// Send a request through the router and collect status, headers and body.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

/// Error-body message, if any.
#[allow(dead_code)]
pub fn message(body: &Value) -> Option<&str> {
    body.get("message").and_then(Value::as_str)
}

/// Extract the upload id from a creation response's Location header.
#[allow(dead_code)]
pub fn location_id(headers: &HeaderMap) -> String {
    let location = headers
        .get("location")
        .expect("missing Location header")
        .to_str()
        .unwrap();
    location
        .strip_prefix("/files/")
        .expect("unexpected Location format")
        .to_string()
}
