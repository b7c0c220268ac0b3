//! Lazy, compute-once concurrent cache.
//!
//! ## Architecture
//!
//! ```text
//!   LazyCache<K, V, F>
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │ factory: Arc<F>            selector: ShardSelector                │
//!   │                                                                   │
//!   │ shards: [RwLock<FxHashMap<K, Arc<Memo<K, V, F>>>>; n]             │
//!   │   ┌─────────┬─────────┬─────────┬─────────┐                       │
//!   │   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │  one RwLock each      │
//!   │   └─────────┴─────────┴─────────┴─────────┘                       │
//!   └───────────────────────────────────────────────────────────────────┘
//!
//!   get(key)
//!     1. read-lock shard ─ memo present? ──────────────► memo.get_or_produce()
//!     2. build Memo(key, factory)   (no lock, no side effects)
//!     3. write-lock shard ─ entry(key)
//!          ├─ Vacant   → insert new memo (winner)
//!          └─ Occupied → drop new memo, use resident (lost race)
//!     4. winner.get_or_produce()    (shard lock already released)
//! ```
//!
//! ## Guarantees
//!
//! - At most one memo per key is ever registered; a memo that loses the
//!   registration race is dropped before its factory can run.
//! - Production for a key runs at most once per success and never under a
//!   shard lock, so a slow production blocks only callers of that key.
//! - Entries live as long as the cache. There is no eviction or expiry.
//! - Production errors are returned unchanged and leave the entry
//!   unrealized; the next `get` retries.
//!
//! ## Example Usage
//!
//! ```
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use replaykit::cache::LazyCache;
//!
//! let cache: LazyCache<String, usize, _> =
//!     LazyCache::new(|key: &String| Ok::<_, Infallible>(Some(key.len())));
//!
//! let a = cache.get("hello".to_string()).unwrap();
//! let b = cache.get("hello".to_string()).unwrap();
//! assert_eq!(*a, 5);
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builder::CacheBuilder;
use crate::ds::cyclic_iter::Rewind;
use crate::ds::shard::ShardSelector;
#[cfg(feature = "metrics")]
use crate::memo::Resolution;
use crate::memo::{Memo, ValueFactory};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsRecorder, CacheMetricsSnapshot};

type Shard<K, V, F> = RwLock<FxHashMap<K, Arc<Memo<K, V, F>>>>;

/// Concurrent map from keys to single-flight memos.
pub struct LazyCache<K, V, F> {
    shards: Box<[Shard<K, V, F>]>,
    selector: ShardSelector,
    factory: Arc<F>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V, F> LazyCache<K, V, F>
where
    K: Eq + Hash + Clone + fmt::Debug,
    F: ValueFactory<K, V>,
{
    /// Creates a cache with the default shard configuration.
    pub fn new(factory: F) -> Self {
        CacheBuilder::new().build(factory)
    }

    /// Returns the value for `key`, producing it on first use.
    ///
    /// Blocks only while another caller is producing the same key.
    ///
    /// # Errors
    ///
    /// Returns the factory's error unchanged. Nothing is cached on failure.
    ///
    /// # Panics
    ///
    /// Panics if the factory returns `Ok(None)` for `key`.
    pub fn get(&self, key: K) -> Result<Arc<V>, F::Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_get_call();

        let result = self.memo_for(key).resolve();
        #[cfg(feature = "metrics")]
        {
            match &result {
                Ok((_, Resolution::Produced)) => self.metrics.record_production(),
                Ok((_, Resolution::Cached)) => {},
                Err(_) => self.metrics.record_production_failure(),
            }
        }
        result.map(|(value, _)| value)
    }

    /// Finds the registered memo for `key`, registering a new one if absent.
    fn memo_for(&self, key: K) -> Arc<Memo<K, V, F>> {
        let shard = &self.shards[self.selector.shard_for_key(&key)];

        if let Some(memo) = shard.read().get(&key) {
            return Arc::clone(memo);
        }

        let candidate = Arc::new(Memo::new(key.clone(), Arc::clone(&self.factory)));
        match shard.write().entry(key) {
            Entry::Occupied(entry) => {
                tracing::trace!(key = ?entry.key(), "lost registration race, discarding memo");
                #[cfg(feature = "metrics")]
                self.metrics.record_lost_race();
                Arc::clone(entry.get())
            },
            Entry::Vacant(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_registration();
                Arc::clone(entry.insert(candidate))
            },
        }
    }
}

impl<K, V, F> LazyCache<K, V, F> {
    pub(crate) fn from_parts(selector: ShardSelector, factory: F) -> Self {
        let shards = (0..selector.shard_count())
            .map(|_| RwLock::new(FxHashMap::default()))
            .collect();
        Self {
            shards,
            selector,
            factory: Arc::new(factory),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns every value produced so far. Never triggers production.
    pub fn values(&self) -> Vec<Arc<V>> {
        let mut values = Vec::new();
        for shard in self.shards.iter() {
            values.extend(shard.read().values().filter_map(|memo| memo.get()));
        }
        values
    }

    /// Number of registered keys, realized or not.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// Returns `true` if no key has been looked up yet.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    /// Number of shards backing the entry map.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the factory shared by every memo.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    fn realized_count(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().values().filter(|m| m.is_realized()).count())
            .sum()
    }

    /// Snapshot of the cache's counters and entry gauges.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.realized_count())
    }
}

impl<K, V, F> LazyCache<K, V, F>
where
    K: Eq + Hash,
{
    /// Returns `true` if `key` has been registered (produced or not).
    pub fn contains(&self, key: &K) -> bool {
        self.shards[self.selector.shard_for_key(key)]
            .read()
            .contains_key(key)
    }
}

impl<K, V, F> LazyCache<K, V, F>
where
    V: Rewind,
{
    /// Rewinds the replay position of every realized value.
    ///
    /// Cached values are neither cleared nor recomputed.
    pub fn reset_all(&self) {
        let mut rewound = 0usize;
        for value in self.values() {
            value.rewind();
            rewound += 1;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_reset();
        tracing::debug!(rewound, "rewound cached values");
    }
}

#[cfg(feature = "metrics")]
impl<K, V, F> crate::metrics::MetricsSnapshotProvider<CacheMetricsSnapshot> for LazyCache<K, V, F> {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, F> fmt::Debug for LazyCache<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("shards", &self.shards.len())
            .field("entries", &self.len())
            .field("realized", &self.realized_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ds::CyclicIter;

    type Produce = Box<dyn Fn(&String) -> Result<Option<String>, String> + Send + Sync>;

    fn counting_cache(calls: Arc<AtomicUsize>) -> LazyCache<String, String, Produce> {
        let factory: Produce = Box::new(move |key: &String| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(format!("value-{key}")))
        });
        LazyCache::new(factory)
    }

    #[test]
    fn distinct_keys_produce_distinct_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(calls.clone());

        for _ in 0..3 {
            let values: Vec<_> = (0..1_000)
                .map(|i| cache.get(i.to_string()).unwrap())
                .collect();
            let unique: HashSet<_> = values.iter().map(|v| Arc::as_ptr(v)).collect();
            assert_eq!(unique.len(), 1_000);
            assert_eq!(calls.load(Ordering::SeqCst), 1_000);
        }
        assert_eq!(cache.len(), 1_000);
    }

    #[test]
    fn repeated_get_returns_same_instance() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(calls.clone());
        let first = cache.get("aaa".to_string()).unwrap();
        let second = cache.get(String::from("aaa")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn values_lists_only_realized_entries() {
        let cache = LazyCache::new(|key: &u32| -> Result<Option<u32>, String> {
            if *key == 0 {
                Err("zero".to_string())
            } else {
                Ok(Some(key * 10))
            }
        });
        assert!(cache.is_empty());
        cache.get(1).unwrap();
        cache.get(2).unwrap();
        assert!(cache.get(0).is_err());

        let mut values: Vec<u32> = cache.values().iter().map(|v| **v).collect();
        values.sort_unstable();
        assert_eq!(values, [10, 20]);
        assert_eq!(cache.len(), 3);
        assert!(cache.contains(&0));
        assert!(!cache.contains(&9));
    }

    #[test]
    fn failure_then_success_retries() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_in = attempts.clone();
        let cache = LazyCache::new(move |_: &&str| -> Result<Option<u8>, String> {
            match attempts_in.fetch_add(1, Ordering::SeqCst) {
                0 => Err("first attempt fails".to_string()),
                _ => Ok(Some(1)),
            }
        });

        assert_eq!(cache.get("k").unwrap_err(), "first attempt fails");
        assert!(cache.values().is_empty());
        assert_eq!(*cache.get("k").unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "must not produce an empty value")]
    fn empty_value_is_fatal() {
        let cache = LazyCache::new(|_: &&str| -> Result<Option<String>, String> { Ok(None) });
        let _ = cache.get("will cause a panic");
    }

    #[test]
    fn reset_all_rewinds_every_iterator() {
        let cache = LazyCache::new(|key: &u8| -> Result<Option<CyclicIter<u8>>, String> {
            Ok(Some(CyclicIter::new(vec![*key, *key + 1, *key + 2])))
        });
        let a = cache.get(10).unwrap();
        let b = cache.get(20).unwrap();
        assert_eq!(a.next(), Some(&10));
        assert_eq!(a.next(), Some(&11));
        assert_eq!(b.next(), Some(&20));

        cache.reset_all();

        assert_eq!(a.next(), Some(&10));
        assert_eq!(b.next(), Some(&20));
        assert!(Arc::ptr_eq(&a, &cache.get(10).unwrap()));
    }

    #[test]
    fn single_shard_layout_works() {
        let cache = CacheBuilder::new()
            .shards(1)
            .build(|key: &u64| -> Result<Option<u64>, ()> { Ok(Some(*key)) });
        assert_eq!(cache.shard_count(), 1);
        for i in 0..64 {
            assert_eq!(*cache.get(i).unwrap(), i);
        }
        assert_eq!(cache.len(), 64);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_gets_and_productions() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting_cache(calls);
        cache.get("a".to_string()).unwrap();
        cache.get("a".to_string()).unwrap();
        cache.get("b".to_string()).unwrap();

        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.get_calls, 3);
        assert_eq!(snapshot.registrations, 2);
        assert_eq!(snapshot.productions, 2);
        assert_eq!(snapshot.production_failures, 0);
        assert_eq!(snapshot.lost_races, 0);
        assert_eq!(snapshot.entries, 2);
        assert_eq!(snapshot.realized, 2);
    }
}
