//! Application state shared across handlers.

use crate::locks::UploadLocks;
use hoist_core::config::AppConfig;
use hoist_metadata::MetadataStore;
use hoist_storage::BlobSink;
use std::sync::Arc;

/// Shared application state.
///
/// The metadata store is the only mutable singleton; it is an explicit
/// dependency here rather than module state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Upload record store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Payload byte sink.
    pub blobs: Arc<dyn BlobSink>,
    /// Per-upload-id PATCH serialization.
    pub locks: Arc<UploadLocks>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            blobs,
            locks: Arc::new(UploadLocks::new()),
        }
    }
}
