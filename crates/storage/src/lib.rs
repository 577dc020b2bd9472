//! Blob sink backends.
//!
//! The protocol engine treats payload storage as an append-addressable byte
//! sink keyed by an opaque blob path. This crate defines that contract and
//! provides the local filesystem backend.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::{AppendError, BlobSink, ByteStream};

use hoist_core::config::StorageConfig;
use std::sync::Arc;

/// Build a blob sink from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobSink>> {
    match config {
        StorageConfig::Filesystem { path } => {
            Ok(Arc::new(FilesystemBackend::new(path).await?))
        }
    }
}
