//! HTTP surface for the hoist resumable upload service.
//!
//! This crate wires the protocol engine together:
//! - the four verb handlers (OPTIONS, POST, HEAD, PATCH) under `/api/v3/files`
//! - the protocol-version header filters
//! - the per-upload lock registry serializing PATCH execution
//! - the streaming body pipeline with partial-write accounting

pub mod body;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod locks;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
