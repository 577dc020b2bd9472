//! Core domain types for the hoist resumable upload protocol.
//!
//! This crate defines the upload record and its lifecycle, the protocol
//! extension set, checksum parsing and streaming verification, header
//! constants, and the shared configuration types. It is free of HTTP and
//! storage concerns; those live in the sibling crates.

pub mod checksum;
pub mod config;
pub mod error;
pub mod extension;
pub mod protocol;
pub mod upload;

pub use error::{Error, Result};

/// Default lifetime of an upload before it expires (10 minutes).
pub const UPLOAD_MAX_DURATION_SECS: u64 = 600;

/// Default cap on a single PATCH request body (64 MiB).
pub const MAX_PATCH_BODY_BYTES: u64 = 64 * 1024 * 1024;
