//! Session-scoped suggestion cache keyed by normalized query text
use crate::suggest::Suggestion;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved suggestion result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CacheEntry {
    pub candidates: Vec<Suggestion>,
    /// Untruncated number of matches across both lookups
    pub total_count: usize,
}

/// Write-once cache. No expiry and no eviction: an entry lives as long as the
/// cache does.
#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, normalized: &str) -> Option<Arc<CacheEntry>> {
        self.entries.read().get(normalized).cloned()
    }

    /// Store `entry` unless the key is already present. Returns whether it was stored.
    pub fn put(&self, normalized: impl Into<String>, entry: Arc<CacheEntry>) -> bool {
        let mut entries = self.entries.write();
        let key = normalized.into();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, entry);
        true
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.entries.read().contains_key(normalized)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
