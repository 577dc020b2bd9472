//! Upload record store.
//!
//! The protocol engine needs exactly two operations: a snapshot lookup and an
//! atomic overwrite, both keyed by upload id. Anything that linearizes those
//! two calls can back the server; the in-memory implementation here is the
//! default.

pub mod error;
pub mod memory;

pub use error::{MetadataError, MetadataResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use hoist_core::upload::{Upload, UploadId};

/// Record store abstraction.
///
/// A `save` that returns is visible to every subsequent `find`. There is no
/// separate create or delete: a record is absent until the first save, and
/// out-of-band cleanup is the only way it disappears.
#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
    /// Look up a record by id, returning a value snapshot.
    async fn find(&self, id: &UploadId) -> MetadataResult<Option<Upload>>;

    /// Atomically overwrite the record keyed by `upload.id`.
    async fn save(&self, upload: &Upload) -> MetadataResult<()>;
}
