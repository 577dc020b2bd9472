//! Version negotiation and capability advertisement tests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TestServer, send};
use hoist_core::extension::Extensions;

#[tokio::test]
async fn options_advertises_versions_only_when_nothing_is_configured() {
    let server = TestServer::with_config(|config| {
        config.protocol.extensions = Extensions::none();
        config.protocol.max_size = 0;
    })
    .await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v3/files")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(headers.get("tus-version").unwrap(), "0.2.0,1.0.0");
    assert!(headers.get("tus-extension").is_none());
    assert!(headers.get("tus-max-size").is_none());
    assert!(headers.get("tus-checksum-algorithm").is_none());
    assert!(body.is_null());
}

#[tokio::test]
async fn options_advertises_extensions_and_limits() {
    let server = TestServer::with_config(|config| {
        config.protocol.max_size = 1_073_741_824;
    })
    .await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v3/files")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers.get("tus-extension").unwrap(),
        "creation,expiration,checksum"
    );
    assert_eq!(headers.get("tus-max-size").unwrap(), "1073741824");
    assert_eq!(headers.get("tus-checksum-algorithm").unwrap(), "md5,sha1");
}

#[tokio::test]
async fn options_needs_no_version_header_and_is_not_stamped() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/v3/files")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(headers.get("tus-resumable").is_none());
}

#[tokio::test]
async fn missing_version_header_is_rejected_before_any_handler() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .method("HEAD")
        .uri("/api/v3/files/a")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers.get("upload-offset").is_none());
    assert!(headers.get("upload-length").is_none());
}

#[tokio::test]
async fn unsupported_version_is_rejected_with_412() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .method("HEAD")
        .uri("/api/v3/files/a")
        .header("tus-resumable", "1.0.1")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(headers.get("upload-offset").is_none());
    // Even rejections carry the protocol version.
    assert_eq!(headers.get("tus-resumable").unwrap(), "1.0.0");
}

#[tokio::test]
async fn both_supported_versions_are_accepted() {
    let server = TestServer::new().await;

    for version in ["0.2.0", "1.0.0"] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v3/files")
            .header("tus-resumable", version)
            .header("upload-length", "5")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&server.router, request).await;
        assert_eq!(status, StatusCode::CREATED, "version {version}");
    }
}

#[tokio::test]
async fn non_options_responses_are_stamped() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v3/files")
        .header("tus-resumable", "1.0.0")
        .header("upload-length", "5")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&server.router, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers.get("tus-resumable").unwrap(), "1.0.0");
}
