//! Photo references.
//!
//! A [`PhotoRef`] is the handle stored on a work or teaching record. It is
//! classified once, when it is built or parsed, into one of two kinds:
//!
//! - **Embedded**: a `data:<mime>;base64,<payload>` URI carrying the image
//!   bytes inline.
//! - **External**: an `http://` or `https://` URL pointing at a remote object
//!   store.
//!
//! Both kinds serialize to their plain textual form, which is also what the
//! database columns and snapshot files hold.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::StorageMode;

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors produced when a string is not a recognizable photo reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoRefError {
    /// The string is empty.
    #[error("photo reference is empty")]
    Empty,

    /// A `data:` URI that is not base64-encoded.
    #[error("embedded photo reference is not a base64 data URI")]
    NotBase64,

    /// The string is neither a data URI nor an http(s) URL.
    #[error("unrecognized photo reference: {0}")]
    Unrecognized(String),
}

/// A stored photo, either embedded inline or hosted externally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhotoRef {
    /// Self-contained data URI.
    Embedded { data: String },
    /// Dereferenceable URL in a remote object store.
    External { url: String },
}

impl PhotoRef {
    /// Build an embedded reference from a MIME type and a base64 payload.
    pub fn embedded(mime: &str, base64_payload: &str) -> Self {
        Self::Embedded {
            data: format!("{DATA_URI_PREFIX}{mime}{BASE64_MARKER}{base64_payload}"),
        }
    }

    /// Build an external reference from a URL.
    pub fn external(url: impl Into<String>) -> Result<Self, PhotoRefError> {
        let url = url.into();
        if is_http_url(&url) {
            Ok(Self::External { url })
        } else {
            Err(PhotoRefError::Unrecognized(truncate(&url)))
        }
    }

    /// Which backend kind produced this reference.
    pub fn kind(&self) -> StorageMode {
        match self {
            Self::Embedded { .. } => StorageMode::Embedded,
            Self::External { .. } => StorageMode::External,
        }
    }

    /// Whether the photo bytes are carried inline.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }

    /// The textual form of the reference.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Embedded { data } => data,
            Self::External { url } => url,
        }
    }

    /// Length of the textual form in bytes.
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// References are never empty once constructed.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// The base64 payload of an embedded reference.
    pub fn embedded_payload(&self) -> Option<&str> {
        match self {
            Self::Embedded { data } => data
                .find(BASE64_MARKER)
                .map(|idx| &data[idx + BASE64_MARKER.len()..]),
            Self::External { .. } => None,
        }
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PhotoRef {
    type Err = PhotoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PhotoRefError::Empty);
        }

        if s.starts_with(DATA_URI_PREFIX) {
            if !s.contains(BASE64_MARKER) {
                return Err(PhotoRefError::NotBase64);
            }
            return Ok(Self::Embedded {
                data: s.to_string(),
            });
        }

        Self::external(s)
    }
}

impl TryFrom<String> for PhotoRef {
    type Error = PhotoRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhotoRef> for String {
    fn from(photo: PhotoRef) -> Self {
        match photo {
            PhotoRef::Embedded { data } => data,
            PhotoRef::External { url } => url,
        }
    }
}

fn is_http_url(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    let rest = if lower.starts_with("https://") {
        &s[8..]
    } else if lower.starts_with("http://") {
        &s[7..]
    } else {
        return false;
    };
    !rest.is_empty()
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}
