//! Replay facade: hands out the next recorded message for a category and
//! request id.
//!
//! `ReplayCache` keys a [`LazyCache`] by [`CacheKey`], drains the
//! [`RecordSource`] once per key and replays the records round-robin on every
//! later call. Simulators that replay more than one record kind (parsed
//! messages and raw payloads, say) keep one `ReplayCache` per kind.
//!
//! ## Example
//!
//! ```
//! use std::fmt;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use replaykit::key::DataType;
//! use replaykit::reader::{RecordSource, EXHAUSTED_MARKER};
//! use replaykit::replay::ReplayCache;
//!
//! #[derive(Debug)]
//! struct SheetError(String);
//!
//! impl fmt::Display for SheetError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str(&self.0)
//!     }
//! }
//!
//! impl std::error::Error for SheetError {}
//!
//! struct Sheet {
//!     row: AtomicUsize,
//! }
//!
//! impl RecordSource<DataType> for Sheet {
//!     type Record = String;
//!     type Error = SheetError;
//!
//!     fn read_one(&self, category: &DataType, request_id: &str) -> Result<String, SheetError> {
//!         match self.row.fetch_add(1, Ordering::SeqCst) {
//!             row @ 0..=1 => Ok(format!("{category}:{request_id}:{row}")),
//!             _ => Err(SheetError(EXHAUSTED_MARKER.to_string())),
//!         }
//!     }
//! }
//!
//! let cache = ReplayCache::new(Sheet { row: AtomicUsize::new(0) });
//! let category = DataType::ResponseBodyMessages;
//!
//! let first = cache.next(category, "RM01").unwrap();
//! let second = cache.next(category, "RM01").unwrap();
//! let third = cache.next(category, "RM01").unwrap();
//! assert_eq!(first.as_deref(), Some("RESPONSE_BODY_MESSAGES:RM01:0"));
//! assert_eq!(second.as_deref(), Some("RESPONSE_BODY_MESSAGES:RM01:1"));
//! assert_eq!(third, first);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::builder::CacheBuilder;
use crate::cache::LazyCache;
use crate::ds::CyclicIter;
use crate::error::ConfigError;
use crate::key::CacheKey;
#[cfg(feature = "metrics")]
use crate::metrics::CacheMetricsSnapshot;
use crate::reader::{RecordSource, ReplayFactory};

type Inner<C, S> = LazyCache<
    CacheKey<C>,
    CyclicIter<<S as RecordSource<C>>::Record>,
    ReplayFactory<S>,
>;

/// Per-key replay of records drained once from a [`RecordSource`].
pub struct ReplayCache<C, S>
where
    S: RecordSource<C>,
{
    inner: Inner<C, S>,
}

impl<C, S> ReplayCache<C, S>
where
    C: Clone + fmt::Display,
    S: RecordSource<C>,
{
    /// Creates a replay cache over `source` with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            inner: LazyCache::new(ReplayFactory::new(source)),
        }
    }

    /// Creates a replay cache over `source` configured by `builder`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. See
    /// [`try_with_builder`](Self::try_with_builder).
    pub fn with_builder(builder: CacheBuilder, source: S) -> Self {
        Self {
            inner: builder.build(ReplayFactory::new(source)),
        }
    }

    /// Creates a replay cache over `source` configured by `builder`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the builder's shard count is out of range.
    pub fn try_with_builder(builder: CacheBuilder, source: S) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: builder.try_build(ReplayFactory::new(source))?,
        })
    }

    /// Returns the replay iterator for `(category, request_id)`, draining the
    /// source on first use.
    ///
    /// # Errors
    ///
    /// Returns the source's error if draining fails. The key is retried on the
    /// next call.
    pub fn iter(
        &self,
        category: C,
        request_id: impl Into<String>,
    ) -> Result<Arc<CyclicIter<S::Record>>, S::Error> {
        self.inner.get(CacheKey::new(category, request_id))
    }

    /// Returns the next replayed record for `(category, request_id)`.
    ///
    /// `Ok(None)` means the source had no records for the key.
    ///
    /// # Errors
    ///
    /// Same as [`iter`](Self::iter).
    pub fn next(
        &self,
        category: C,
        request_id: impl Into<String>,
    ) -> Result<Option<S::Record>, S::Error>
    where
        S::Record: Clone,
    {
        let iter = self.iter(category, request_id)?;
        Ok(iter.next().cloned())
    }
}

impl<C, S> ReplayCache<C, S>
where
    S: RecordSource<C>,
{
    /// Rewinds every drained key to its first record.
    ///
    /// Meant for tests that replay the same conversation more than once.
    pub fn reset(&self) {
        self.inner.reset_all();
    }

    /// Returns the iterators of every key drained so far.
    pub fn values(&self) -> Vec<Arc<CyclicIter<S::Record>>> {
        self.inner.values()
    }

    /// Number of keys looked up so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the underlying record source.
    pub fn source(&self) -> &S {
        self.inner.factory().source()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.metrics_snapshot()
    }
}

impl<C, S> fmt::Debug for ReplayCache<C, S>
where
    S: RecordSource<C>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayCache")
            .field("inner", &self.inner)
            .finish()
    }
}
