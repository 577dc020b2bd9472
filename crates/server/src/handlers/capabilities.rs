//! Capability advertisement endpoint.

use crate::error::ApiResult;
use crate::handlers::header_value;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use hoist_core::extension::Extension;
use hoist_core::protocol;

/// OPTIONS /api/v3/files - advertise versions, extensions and limits.
///
/// The body is empty and, unlike every other verb, the response carries no
/// `Tus-Resumable` header.
#[tracing::instrument(skip(state))]
pub async fn get_capabilities(State(state): State<AppState>) -> ApiResult<Response> {
    let protocol_config = &state.config.protocol;

    let mut headers = HeaderMap::new();
    headers.insert(
        protocol::TUS_VERSION,
        header_value(&protocol::supported_versions_header())?,
    );
    if !protocol_config.extensions.is_empty() {
        headers.insert(
            protocol::TUS_EXTENSION,
            header_value(&protocol_config.extensions.to_string())?,
        );
    }
    if protocol_config.max_size > 0 {
        headers.insert(
            protocol::TUS_MAX_SIZE,
            header_value(&protocol_config.max_size.to_string())?,
        );
    }
    if protocol_config.extensions.enabled(Extension::Checksum) {
        headers.insert(
            protocol::TUS_CHECKSUM_ALGORITHM,
            header_value(&protocol_config.checksum_algorithms_header())?,
        );
    }

    Ok((StatusCode::NO_CONTENT, headers).into_response())
}
