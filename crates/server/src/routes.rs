//! Route configuration.

use crate::filters::{require_tus_version, stamp_tus_version};
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{head, options};
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// Layer order matters: the version check runs innermost so rejected
/// requests never reach a handler, the version stamp wraps the check so even
/// those rejections carry `Tus-Resumable`, and tracing wraps everything.
pub fn create_router(state: AppState) -> Router {
    let files = Router::new()
        .route(
            "/files",
            options(handlers::get_capabilities).post(handlers::create_upload),
        )
        .route(
            "/files/{file_id}",
            head(handlers::get_offset).patch(handlers::patch_upload),
        );

    Router::new()
        .nest("/api/v3", files)
        .layer(middleware::from_fn(require_tus_version))
        .layer(middleware::from_fn(stamp_tus_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
