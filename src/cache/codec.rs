//! Short Key Codec
//!
//! Maps remote status identifiers to compact display keys.

use std::borrow::Cow;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BridgeError, Result};
use crate::models::StatusRecord;

/// Number of identifier-hash bits kept in a key.
pub const SHORT_KEY_BITS: u32 = 24;

const SHORT_KEY_BYTES: usize = (SHORT_KEY_BITS / 8) as usize;

// == Short Key ==
/// Four-character base64 token standing in for a remote status id.
///
/// Deterministic for a given id, but only 24 bits wide: two ids can share
/// a key, in which case the later cache insert overwrites the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(String);

impl ShortKey {
    // == Encode ==
    /// Derives the key for an identifier.
    ///
    /// Hashes the identifier's string form with SHA-256 and keeps the low
    /// 24 bits of the digest, rendered big-endian as three bytes of base64.
    pub fn encode(id: &str) -> Self {
        let digest = Sha256::digest(id.as_bytes());
        let low = &digest[digest.len() - SHORT_KEY_BYTES..];
        Self(STANDARD.encode(low))
    }

    /// Derives the key for a status record.
    ///
    /// Fails with `InvalidInput` when the record has no identifier.
    pub fn for_status(status: &StatusRecord) -> Result<Self> {
        if status.id.is_empty() {
            return Err(BridgeError::InvalidInput(
                "Tried to derive a key from a record without an id".to_string(),
            ));
        }
        Ok(Self::encode(&status.id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as a URL path segment.
    ///
    /// The base64 alphabet includes `/` and `+`, so both are percent-encoded.
    pub fn path_segment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl fmt::Display for ShortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keys typed by users are taken verbatim; an unknown key is just a cache miss.
impl From<&str> for ShortKey {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for ShortKey {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}
