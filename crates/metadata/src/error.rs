//! Metadata store error types.

use thiserror::Error;

/// Metadata store operation errors.
///
/// The in-memory store never fails; durable implementations surface their
/// transport problems through these variants and handlers report them as
/// internal protocol errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;
