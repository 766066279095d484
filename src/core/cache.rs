//! Extraction-result cache with LRU eviction.
//!
//! The cache is an explicit collaborator passed into each snapshot build,
//! never module-level state, so two snapshots of different refs can never
//! observe each other's results. Entries are keyed by content hash, which
//! makes the cache safe to share across refs when a file is unchanged
//! between them; hits are re-attributed to the requesting path, since two
//! distinct files may hold identical text.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

use crate::core::ModuleFacts;

/// Fixed-capacity LRU cache for per-file extraction results
#[derive(Debug)]
pub struct FactCache {
    capacity: usize,
    entries: HashMap<String, CacheSlot>,
    // Monotonic touch counter; the entry with the smallest stamp is evicted
    clock: u64,
    hits: usize,
    misses: usize,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    facts: ModuleFacts,
    stamp: u64,
}

/// Cache hit/miss counters, surfaced in verbose output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub len: usize,
}

impl FactCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Hash file content into a cache key
    pub fn content_key(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up cached facts by content key, refreshing recency on hit
    pub fn get(&mut self, key: &str) -> Option<ModuleFacts> {
        self.clock += 1;
        let clock = self.clock;
        match self.entries.get_mut(key) {
            Some(slot) => {
                slot.stamp = clock;
                self.hits += 1;
                Some(slot.facts.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert facts, evicting the least-recently-touched entry at capacity
    pub fn put(&mut self, key: String, facts: ModuleFacts) {
        self.clock += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            CacheSlot {
                facts,
                stamp: self.clock,
            },
        );
    }

    /// Cached facts for the file at `path` with `content`, or the result of
    /// `compute`, memoized.
    ///
    /// Keys are content hashes, so a hit may come from a different file
    /// holding identical text; the returned facts are always re-attributed
    /// to `path` so module identity never leaks between files.
    pub fn get_or_compute<F, E>(
        &mut self,
        path: &Path,
        content: &str,
        compute: F,
    ) -> Result<ModuleFacts, E>
    where
        F: FnOnce() -> Result<ModuleFacts, E>,
    {
        let key = Self::content_key(content);
        if let Some(facts) = self.get(&key) {
            return Ok(attribute_to(facts, path));
        }
        let facts = compute()?;
        self.put(key, facts.clone());
        Ok(facts)
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| slot.stamp)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
        }
    }
}

/// Stamp every fact with `path` as its owning module
fn attribute_to(mut facts: ModuleFacts, path: &Path) -> ModuleFacts {
    let module = path.to_string_lossy().into_owned();
    for export in &mut facts.exports {
        export.module = module.clone();
    }
    for import in &mut facts.imports {
        import.module = module.clone();
    }
    facts
}

impl Default for FactCache {
    fn default() -> Self {
        // Large enough for typical projects without unbounded growth
        Self::new(4096)
    }
}
