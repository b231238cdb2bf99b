// Stable identifiers for frame collections

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Identifies a frame collection by the folder and name prefix it was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(u64);

impl CollectionId {
    /// Derive the ID of the collection `folder/prefix{i}`
    pub fn from_source(folder: &str, prefix: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        folder.hash(&mut hasher);
        prefix.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Create an ID from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}
