//! Cryptographic digest types and incremental hashing.
//!
//! Evidence integrity uses two independent algorithms (MD5 and SHA-256)
//! computed over the same byte stream, so a weakness in one algorithm does
//! not silently void the fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 content hash represented as 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Compute SHA-256 hash of data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        Self(result.into())
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != 64 {
            return Err(crate::Error::InvalidDigest(format!(
                "expected 64 hex chars, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hex_str = std::str::from_utf8(chunk)
                .map_err(|e| crate::Error::InvalidDigest(e.to_string()))?;
            bytes[i] = u8::from_str_radix(hex_str, 16)
                .map_err(|e| crate::Error::InvalidDigest(e.to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// Encode as lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// An MD5 digest represented as 16 bytes.
///
/// MD5 is kept for cross-tool compatibility with existing forensic
/// workflows; it is never used alone for integrity decisions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Md5Hash([u8; 16]);

impl Md5Hash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Compute MD5 hash of data.
    pub fn compute(data: &[u8]) -> Self {
        Self(md5::compute(data).0)
    }

    /// Encode as lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Md5Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Md5Hash({})", self.to_hex())
    }
}

impl fmt::Display for Md5Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// The combined dual-algorithm digest of one evidence file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDigest {
    pub md5: Md5Hash,
    pub sha256: ContentHash,
}

impl EvidenceDigest {
    /// Render the combined descriptive string stored in a FeatureRecord.
    pub fn to_combined_string(&self) -> String {
        format!("MD5: {}, SHA256: {}", self.md5.to_hex(), self.sha256.to_hex())
    }
}

impl fmt::Display for EvidenceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_combined_string())
    }
}

/// Incremental dual hasher feeding both algorithms from one stream.
pub struct EvidenceHasher {
    md5: md5::Context,
    sha256: Sha256,
}

impl EvidenceHasher {
    /// Create a new dual hasher.
    pub fn new() -> Self {
        Self {
            md5: md5::Context::new(),
            sha256: Sha256::new(),
        }
    }

    /// Update both digests with data.
    pub fn update(&mut self, data: &[u8]) {
        self.md5.consume(data);
        self.sha256.update(data);
    }

    /// Finalize and return the combined digest.
    pub fn finalize(self) -> EvidenceDigest {
        EvidenceDigest {
            md5: Md5Hash(self.md5.compute().0),
            sha256: ContentHash(self.sha256.finalize().into()),
        }
    }
}

impl Default for EvidenceHasher {
    fn default() -> Self {
        Self::new()
    }
}
