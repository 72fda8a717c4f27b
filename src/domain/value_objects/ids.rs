//! Document identifiers
//!
//! Every asset, subset and version document carries an opaque string id.
//! Version ids double as dependency keys, so they share the same type.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

static GENERATED: AtomicU64 = AtomicU64::new(0);

/// Opaque id of a database document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Id of a version document (dependency edges point at these)
pub type VersionId = DocumentId;

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh 24 hex digit id.
    ///
    /// The first 8 digits are the creation time in seconds, so ids created
    /// later sort after earlier ones within a process.
    pub fn generate() -> Self {
        let now = chrono::Utc::now();
        let sequence = GENERATED.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        hasher.update(sequence.to_le_bytes());
        let digest = hasher.finalize();

        let tail: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!("{:08x}{}", now.timestamp() as u32, tail))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_24_hex_digits() {
        let id = DocumentId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<_> = (0..256).map(|_| DocumentId::generate()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::new("5f1a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5f1a\"");
    }
}
