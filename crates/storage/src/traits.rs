//! Blob sink trait definitions.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::fmt;
use std::pin::Pin;

/// A boxed stream of body bytes feeding an append.
///
/// Items are `io::Result` so the producer can classify failures (a timed-out
/// read carries `ErrorKind::TimedOut`) without the sink knowing about HTTP.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// An append that stopped early.
///
/// `written` is the number of bytes durably present beyond the requested
/// offset at the time of failure; the caller commits exactly that many.
#[derive(Debug)]
pub struct AppendError {
    pub written: u64,
    pub source: StorageError,
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "append stopped after {} bytes: {}", self.written, self.source)
    }
}

impl std::error::Error for AppendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Append-addressable byte sink, keyed by an opaque blob path.
///
/// The sink never skips bytes: a successful return of `n`, or an
/// [`AppendError`] with `written = n`, means exactly `n` bytes are durable
/// beyond `offset`. Crash-atomicity is not required; the authoritative offset
/// lives in the metadata store, which only advances after an append returns.
#[async_trait]
pub trait BlobSink: Send + Sync + 'static {
    /// Consume `body` and durably append it starting at `offset`.
    ///
    /// `offset` equal to the current length is a pure append; an `offset`
    /// below the current length truncates to `offset` first (only used when
    /// intentionally rolling back a prior partial write).
    async fn append(
        &self,
        path: &str,
        offset: u64,
        body: ByteStream,
    ) -> Result<u64, AppendError>;

    /// Current durable size of a blob. Zero for a path never appended to.
    async fn length(&self, path: &str) -> StorageResult<u64>;

    /// Shrink a blob back to `length`. Invoked only for checksum rollback.
    async fn truncate(&self, path: &str, length: u64) -> StorageResult<()>;

    /// Static identifier for this backend, used in logs.
    fn backend_name(&self) -> &'static str;
}
