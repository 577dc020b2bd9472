//! Server test harness.

use hoist_core::config::{AppConfig, StorageConfig};
use hoist_metadata::{MemoryStore, MetadataStore};
use hoist_server::{AppState, create_router};
use hoist_storage::{BlobSink, FilesystemBackend};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with default configuration and temporary storage.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let storage_path = temp_dir.path().join("uploads");

        let blobs: Arc<dyn BlobSink> = Arc::new(
            FilesystemBackend::new(&storage_path)
                .await
                .expect("Failed to create blob sink"),
        );
        let metadata: Arc<dyn MetadataStore> = Arc::new(MemoryStore::new());

        let mut config = AppConfig {
            storage: StorageConfig::Filesystem { path: storage_path },
            ..AppConfig::for_testing()
        };
        modifier(&mut config);

        let state = AppState::new(config, metadata, blobs);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata store.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Get access to the underlying blob sink.
    pub fn blobs(&self) -> Arc<dyn BlobSink> {
        self.state.blobs.clone()
    }
}
