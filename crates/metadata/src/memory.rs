//! In-memory record store.

use crate::{MetadataResult, MetadataStore};
use async_trait::async_trait;
use hoist_core::upload::{Upload, UploadId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store with multi-reader/single-writer discipline.
#[derive(Default)]
pub struct MemoryStore {
    uploads: RwLock<HashMap<UploadId, Upload>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Check whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.uploads.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn find(&self, id: &UploadId) -> MetadataResult<Option<Upload>> {
        Ok(self.uploads.read().await.get(id).cloned())
    }

    async fn save(&self, upload: &Upload) -> MetadataResult<()> {
        self.uploads.write().await.insert(upload.id, upload.clone());
        Ok(())
    }
}
