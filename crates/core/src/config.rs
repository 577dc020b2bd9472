//! Configuration types shared across crates.

use crate::checksum::ChecksumAlgorithm;
use crate::extension::Extensions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Deadline for each read from a request body, in seconds. A stalled
    /// client trips this and surfaces as a request timeout with the bytes
    /// read so far committed.
    #[serde(default = "default_body_read_timeout_secs")]
    pub body_read_timeout_secs: u64,
    /// Cap on a single PATCH request body, in bytes.
    #[serde(default = "default_max_patch_body_bytes")]
    pub max_patch_body_bytes: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_body_read_timeout_secs() -> u64 {
    30
}

fn default_max_patch_body_bytes() -> u64 {
    crate::MAX_PATCH_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_read_timeout_secs: default_body_read_timeout_secs(),
            max_patch_body_bytes: default_max_patch_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Get the body read deadline as a Duration.
    pub fn body_read_timeout(&self) -> Duration {
        Duration::from_secs(self.body_read_timeout_secs)
    }
}

/// Protocol negotiation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Extensions advertised via `Tus-Extension`.
    #[serde(default = "Extensions::supported")]
    pub extensions: Extensions,
    /// Maximum accepted `Upload-Length`. Zero means unlimited and omits
    /// `Tus-Max-Size` from OPTIONS responses.
    #[serde(default)]
    pub max_size: u64,
    /// Lifetime granted to a fresh upload when expiration is enabled, in seconds.
    #[serde(default = "default_upload_max_duration_secs")]
    pub upload_max_duration_secs: u64,
    /// Digest algorithms advertised via `Tus-Checksum-Algorithm`.
    #[serde(default = "default_checksum_algorithms")]
    pub checksum_algorithms: Vec<ChecksumAlgorithm>,
}

fn default_upload_max_duration_secs() -> u64 {
    crate::UPLOAD_MAX_DURATION_SECS
}

fn default_checksum_algorithms() -> Vec<ChecksumAlgorithm> {
    vec![ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1]
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            extensions: Extensions::supported(),
            max_size: 0,
            upload_max_duration_secs: default_upload_max_duration_secs(),
            checksum_algorithms: default_checksum_algorithms(),
        }
    }
}

impl ProtocolConfig {
    /// Get the upload lifetime as a `time::Duration`.
    pub fn upload_max_duration(&self) -> time::Duration {
        let secs = i64::try_from(self.upload_max_duration_secs).unwrap_or(i64::MAX);
        time::Duration::seconds(secs)
    }

    /// The `Tus-Checksum-Algorithm` header value.
    pub fn checksum_algorithms_header(&self) -> String {
        let names: Vec<&str> = self
            .checksum_algorithms
            .iter()
            .map(ChecksumAlgorithm::as_str)
            .collect();
        names.join(",")
    }

    /// Check whether a parsed algorithm is in the advertised set.
    pub fn supports_algorithm(&self, algorithm: ChecksumAlgorithm) -> bool {
        self.checksum_algorithms.contains(&algorithm)
    }
}

/// Blob sink backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for upload payloads.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/uploads"),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Protocol negotiation configuration.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Blob sink configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses filesystem storage under `./data/uploads`
    /// unless the caller overrides it.
    pub fn for_testing() -> Self {
        Self::default()
    }
}
