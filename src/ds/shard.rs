//! Seeded key-to-shard mapping for the lazy cache's entry map.
//!
//! [`LazyCache`](crate::cache::LazyCache) splits its entries across several
//! independently locked maps. [`ShardSelector`] decides which map owns a key,
//! so two callers touching unrelated keys usually take different locks.
//!
//! ```text
//!   key ──► FxHasher(seed, key) ──► hash % shards ──► shard index
//!
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! The mapping is deterministic for a given `(key, seed, shards)` tuple.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Picks the entry-map shard that owns a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Selector over `shards` maps (at least one) hashing with `seed`.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Number of shards keys are spread over.
    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Returns the seed mixed into every hash.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shard index in `[0, shards)` owning `key`.
    pub fn shard_for_key<K: Hash + ?Sized>(&self, key: &K) -> usize {
        if self.shards == 1 {
            return 0;
        }
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.seed);
        key.hash(&mut hasher);
        let hash = hasher.finish() as usize;
        hash % self.shards
    }
}

impl Default for ShardSelector {
    fn default() -> Self {
        Self::new(1, 0)
    }
}
