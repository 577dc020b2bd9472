//! Per-request integrity validation for the checksum extension.
//!
//! An `Upload-Checksum` header carries `"<algorithm> <digest>"` with a
//! hex-encoded digest. The request body is streamed through a running hash
//! and compared against the expected digest once fully read.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::fmt;
use std::str::FromStr;

/// A digest algorithm the server can verify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
}

impl ChecksumAlgorithm {
    /// The wire name of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// Create an incremental hasher for this algorithm.
    pub fn hasher(&self) -> ChecksumHasher {
        match self {
            Self::Md5 => ChecksumHasher::Md5(Md5::new()),
            Self::Sha1 => ChecksumHasher::Sha1(Sha1::new()),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            _ => Err(crate::Error::UnsupportedChecksumAlgorithm),
        }
    }
}

/// A parsed `Upload-Checksum` header value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadChecksum {
    pub algorithm: ChecksumAlgorithm,
    /// Expected digest, hex-encoded.
    pub digest: String,
}

impl UploadChecksum {
    /// Parse a header value of the form `"<algorithm> <digest>"`.
    pub fn parse(value: &str) -> crate::Result<Self> {
        let parts: Vec<&str> = value.split(' ').collect();
        let [algorithm, digest] = parts.as_slice() else {
            return Err(crate::Error::InvalidChecksumFormat);
        };
        if digest.is_empty() {
            return Err(crate::Error::InvalidChecksumFormat);
        }
        Ok(Self {
            algorithm: algorithm.parse()?,
            digest: (*digest).to_string(),
        })
    }

    /// Compare a computed hex digest against the expected one.
    pub fn matches(&self, computed_hex: &str) -> bool {
        self.digest.eq_ignore_ascii_case(computed_hex)
    }
}

/// Incremental hasher teed off a request body stream.
pub enum ChecksumHasher {
    Md5(Md5),
    Sha1(Sha1),
}

impl ChecksumHasher {
    /// Feed a chunk of body bytes.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
        }
    }

    /// Finalize and return the lowercase hex digest.
    pub fn finalize(self) -> String {
        let bytes = match self {
            Self::Md5(h) => h.finalize().to_vec(),
            Self::Sha1(h) => h.finalize().to_vec(),
        };
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
