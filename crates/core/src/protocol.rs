//! Wire-level protocol constants and formatting.
//!
//! Header names are lowercase because `http::HeaderName` normalizes names;
//! matching is case-insensitive on the wire either way.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub const TUS_RESUMABLE: &str = "tus-resumable";
pub const TUS_VERSION: &str = "tus-version";
pub const TUS_EXTENSION: &str = "tus-extension";
pub const TUS_MAX_SIZE: &str = "tus-max-size";
pub const TUS_CHECKSUM_ALGORITHM: &str = "tus-checksum-algorithm";

pub const UPLOAD_OFFSET: &str = "upload-offset";
pub const UPLOAD_LENGTH: &str = "upload-length";
pub const UPLOAD_METADATA: &str = "upload-metadata";
pub const UPLOAD_DEFER_LENGTH: &str = "upload-defer-length";
pub const UPLOAD_EXPIRES: &str = "upload-expires";
pub const UPLOAD_CHECKSUM: &str = "upload-checksum";

/// Required `Content-Type` for PATCH request bodies.
pub const PATCH_CONTENT_TYPE: &str = "application/offset+octet-stream";

/// Protocol version stamped on every non-OPTIONS response.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Request-side versions the server accepts.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["0.2.0", "1.0.0"];

/// The `Tus-Version` header value.
pub fn supported_versions_header() -> String {
    SUPPORTED_VERSIONS.join(",")
}

/// Check a request's `Tus-Resumable` value against the supported set.
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// RFC 1123 with a literal GMT zone, as `Upload-Expires` requires.
const EXPIRES_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Format an expiry instant for the `Upload-Expires` header.
pub fn format_expires(instant: OffsetDateTime) -> crate::Result<String> {
    instant
        .to_offset(time::UtcOffset::UTC)
        .format(EXPIRES_FORMAT)
        .map_err(|e| crate::Error::TimeFormat(e.to_string()))
}
