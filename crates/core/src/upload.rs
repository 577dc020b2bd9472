//! Upload record types and lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier for an upload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(Uuid);

impl UploadId {
    /// Generate a new random upload ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidUploadId(e.to_string()))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UploadId({})", self.0)
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable state of an upload record.
///
/// These states are computed from the record, never stored: the store does
/// not prevent further PATCHes against a complete record, and expiry is a
/// property of the clock at observation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    /// More bytes are expected.
    Pending,
    /// All declared bytes have been committed.
    Complete,
    /// The expiry deadline has passed.
    Expired,
}

impl UploadState {
    /// Check if the upload reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Expired)
    }
}

/// A single resumable upload: the per-file record backing every verb.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Upload {
    /// Unique upload identifier.
    pub id: UploadId,
    /// Declared total size in bytes, fixed at creation.
    pub total_size: u64,
    /// Bytes durably committed so far. Monotonically non-decreasing and
    /// always equal to the blob sink's length for this record.
    pub uploaded_size: u64,
    /// Opaque client-supplied metadata token, stored verbatim.
    pub metadata: String,
    /// Expiry deadline, set at creation when the expiration extension is on.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    /// Locator the blob sink understands.
    pub blob_path: String,
}

impl Upload {
    /// Create a fresh record with a zero offset.
    pub fn new(total_size: u64, metadata: String, expires_at: Option<OffsetDateTime>) -> Self {
        let id = UploadId::new();
        Self {
            id,
            total_size,
            uploaded_size: 0,
            metadata,
            expires_at,
            blob_path: id.to_string(),
        }
    }

    /// Check whether the record has expired as of `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|deadline| deadline < now)
    }

    /// Check whether every declared byte has been committed.
    pub fn is_complete(&self) -> bool {
        self.uploaded_size == self.total_size
    }

    /// Bytes still missing.
    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.uploaded_size)
    }

    /// Observable state as of `now`. Expiry wins over completeness.
    pub fn state_at(&self, now: OffsetDateTime) -> UploadState {
        if self.is_expired_at(now) {
            UploadState::Expired
        } else if self.is_complete() {
            UploadState::Complete
        } else {
            UploadState::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn upload_id_roundtrip() {
        let id = UploadId::new();
        let parsed = UploadId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(UploadId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn new_upload_starts_empty() {
        let upload = Upload::new(10, "name dGVzdA==".to_string(), None);
        assert_eq!(upload.uploaded_size, 0);
        assert_eq!(upload.remaining(), 10);
        assert_eq!(upload.blob_path, upload.id.to_string());
        assert!(!upload.is_complete());
    }

    #[test]
    fn zero_length_upload_is_immediately_complete() {
        let upload = Upload::new(0, String::new(), None);
        assert!(upload.is_complete());
        assert_eq!(
            upload.state_at(OffsetDateTime::now_utc()),
            UploadState::Complete
        );
    }

    #[test]
    fn expiry_is_observed_not_stored() {
        let now = OffsetDateTime::now_utc();
        let mut upload = Upload::new(5, String::new(), Some(now + Duration::minutes(10)));
        assert_eq!(upload.state_at(now), UploadState::Pending);
        assert!(!upload.is_expired_at(now));

        upload.expires_at = Some(now - Duration::seconds(1));
        assert!(upload.is_expired_at(now));
        assert_eq!(upload.state_at(now), UploadState::Expired);
        assert!(upload.state_at(now).is_terminal());
    }

    #[test]
    fn expiry_wins_over_completeness() {
        let now = OffsetDateTime::now_utc();
        let mut upload = Upload::new(3, String::new(), Some(now - Duration::seconds(1)));
        upload.uploaded_size = 3;
        assert_eq!(upload.state_at(now), UploadState::Expired);
    }

    #[test]
    fn record_without_deadline_never_expires() {
        let upload = Upload::new(5, String::new(), None);
        assert!(!upload.is_expired_at(OffsetDateTime::now_utc() + Duration::days(365)));
    }
}
