//! Protocol extension negotiation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tus protocol extension.
///
/// Only `creation`, `expiration` and `checksum` have handler support;
/// `termination` and `concatenation` may still be advertised through
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Creation,
    Expiration,
    Checksum,
    Termination,
    Concatenation,
}

impl Extension {
    /// The wire name of this extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Expiration => "expiration",
            Self::Checksum => "checksum",
            Self::Termination => "termination",
            Self::Concatenation => "concatenation",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "creation" => Ok(Self::Creation),
            "expiration" => Ok(Self::Expiration),
            "checksum" => Ok(Self::Checksum),
            "termination" => Ok(Self::Termination),
            "concatenation" => Ok(Self::Concatenation),
            other => Err(crate::Error::UnknownExtension(other.to_string())),
        }
    }
}

/// The set of extensions a server instance advertises.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(Vec<Extension>);

impl Extensions {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self(extensions)
    }

    /// The default advertised set: everything with handler support.
    pub fn supported() -> Self {
        Self(vec![
            Extension::Creation,
            Extension::Expiration,
            Extension::Checksum,
        ])
    }

    /// An empty set (no `Tus-Extension` header is emitted).
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn enabled(&self, extension: Extension) -> bool {
        self.0.contains(&extension)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Extension::as_str).collect();
        f.write_str(&names.join(","))
    }
}
