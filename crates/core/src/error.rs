//! Error types for the core domain.
//!
//! Display strings of the protocol-facing variants are used verbatim as
//! response bodies, so they carry no prefixes.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid checksum format")]
    InvalidChecksumFormat,

    #[error("unsupported checksum algorithm")]
    UnsupportedChecksumAlgorithm,

    #[error("invalid upload ID: {0}")]
    InvalidUploadId(String),

    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    #[error("time formatting error: {0}")]
    TimeFormat(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
