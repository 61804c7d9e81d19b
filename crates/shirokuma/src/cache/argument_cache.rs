//! Single-use cache of entry arguments.
//!
//! After a successful publish the node answers with the arguments for the
//! next entry on the same log. They are stored here under the author's public
//! key and the view id the publish produced, and consumed by the next
//! operation that builds on that view.
//!
//! # Semantics
//!
//! - Entries are read once: [`ArgumentCache::take`] removes what it returns
//! - No eviction, TTL or size bound; entries live until consumed or cleared
//! - Not synchronised; the owning session guards it with a lock

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use shirokuma_client::EntryArgs;

use crate::types::{DocumentViewId, PublicKey};

// =============================================================================
// Cache Key
// =============================================================================

/// Identifies the log position an author reaches by building on a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub public_key: PublicKey,
    pub view_id: DocumentViewId,
}

impl CacheKey {
    pub fn new(public_key: PublicKey, view_id: DocumentViewId) -> Self {
        Self { public_key, view_id }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.public_key, self.view_id)
    }
}

// =============================================================================
// Cache Statistics
// =============================================================================

#[derive(Debug, Default)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}

impl CacheStatsSnapshot {
    /// Share of lookups answered from the cache, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// =============================================================================
// Argument Cache
// =============================================================================

/// Map from `(public key, view id)` to the entry arguments for the next
/// operation on that document.
#[derive(Debug, Default)]
pub struct ArgumentCache {
    entries: HashMap<CacheKey, EntryArgs>,
    stats: CacheStats,
}

impl ArgumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store arguments, replacing any previous value for the key.
    pub fn insert(&mut self, key: CacheKey, args: EntryArgs) -> Option<EntryArgs> {
        self.stats.record_insert();
        self.entries.insert(key, args)
    }

    /// Put back arguments a failed operation took, without counting an insert.
    pub fn restore(&mut self, key: CacheKey, args: EntryArgs) {
        self.entries.insert(key, args);
    }

    /// Look at cached arguments without consuming them. Not counted in stats.
    pub fn get(&self, key: &CacheKey) -> Option<&EntryArgs> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &CacheKey) -> Option<EntryArgs> {
        self.entries.remove(key)
    }

    /// Consume cached arguments. A second `take` for the same key misses.
    pub fn take(&mut self, key: &CacheKey) -> Option<EntryArgs> {
        let taken = self.entries.remove(key);
        if taken.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        taken
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}
