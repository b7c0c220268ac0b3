//! Configuration for [`LazyCache`] and the replay facade built on it.
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//!
//! use replaykit::builder::CacheBuilder;
//! use replaykit::cache::LazyCache;
//!
//! let cache: LazyCache<u32, u32, _> = CacheBuilder::new()
//!     .shards(8)
//!     .seed(42)
//!     .build(|key: &u32| Ok::<_, Infallible>(Some(key + 1)));
//! assert_eq!(cache.shard_count(), 8);
//! assert_eq!(*cache.get(1).unwrap(), 2);
//! ```

use crate::cache::LazyCache;
use crate::ds::shard::ShardSelector;
use crate::error::ConfigError;
use crate::memo::ValueFactory;

/// Upper bound on the number of entry-map shards.
pub const MAX_SHARDS: usize = 4096;

/// Builder for lazy cache instances.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    shards: Option<usize>,
    seed: u64,
}

impl CacheBuilder {
    /// Creates a builder with default settings.
    ///
    /// The shard count defaults to the available parallelism of the host and
    /// the seed to 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of independently locked entry-map shards.
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Sets the seed mixed into shard selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the shard count the cache will be built with.
    pub fn shard_count(&self) -> usize {
        self.shards.unwrap_or_else(default_shards)
    }

    /// Build a cache around `factory`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. For a non-panicking
    /// alternative, use [`try_build`](Self::try_build).
    pub fn build<K, V, F>(self, factory: F) -> LazyCache<K, V, F>
    where
        F: ValueFactory<K, V>,
    {
        match self.try_build(factory) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build a cache around `factory`, returning an error on invalid
    /// configuration instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the shard count is zero or exceeds
    /// [`MAX_SHARDS`].
    pub fn try_build<K, V, F>(self, factory: F) -> Result<LazyCache<K, V, F>, ConfigError>
    where
        F: ValueFactory<K, V>,
    {
        let selector = self.try_selector()?;
        Ok(LazyCache::from_parts(selector, factory))
    }

    pub(crate) fn try_selector(&self) -> Result<ShardSelector, ConfigError> {
        let shards = self.shard_count();
        if shards == 0 {
            return Err(ConfigError::new("shard count must be > 0"));
        }
        if shards > MAX_SHARDS {
            return Err(ConfigError::new(format!(
                "shard count must be <= {MAX_SHARDS}, got {shards}"
            )));
        }
        Ok(ShardSelector::new(shards, self.seed))
    }
}

fn default_shards() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
        .min(MAX_SHARDS)
}
