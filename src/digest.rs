//! Content digests used as optimistic-concurrency tokens.
//!
//! A digest is the lowercase hex SHA-256 of the exact document bytes.
//! Clients echo it back when pushing or polling; the server compares it
//! against the digest of what is currently stored.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 of a document's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Computes the digest of `bytes`.
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        let hash = Sha256::digest(bytes.as_ref());
        Self(format!("{:x}", hash))
    }

    /// Wraps a digest string received from a client.
    ///
    /// No validation is done: a malformed value just never matches.
    pub fn from_client(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Digest::of`].
pub fn digest(bytes: impl AsRef<[u8]>) -> Digest {
    Digest::of(bytes)
}
