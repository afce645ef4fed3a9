use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Computes the content hash used for deduplication (hex-encoded SHA-256)
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Set of content hashes already saved during a run
///
/// The guard is run-scoped: it is shared by every seed's traversal, so the
/// same bytes reached from two different seeds are saved once.
#[derive(Debug, Default, Clone)]
pub struct DedupGuard {
    seen: HashSet<String>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if content with this hash was already recorded
    pub fn is_duplicate(&self, hash: &str) -> bool {
        self.seen.contains(hash)
    }

    /// Records a hash; returns false if it was already present
    pub fn record(&mut self, hash: impl Into<String>) -> bool {
        self.seen.insert(hash.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
