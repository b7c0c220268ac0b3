//! Single-flight memoization of one key's value.
//!
//! ## Architecture
//!
//! ```text
//!   Memo { key, factory: Arc<F>, value: OnceLock<Arc<V>>, lock: Mutex<()> }
//!
//!   get_or_produce()
//!     │
//!     ├─ value.get() is Some ──────────────────────────► return (no locking)
//!     │
//!     └─ lock this memo
//!          ├─ value.get() is Some (a racer won) ───────► return
//!          └─ factory.produce(&key)
//!               ├─ Ok(Some(v)) ─ value.set(Arc::new(v)) ► return
//!               ├─ Ok(None)    ─ panic (contract violation)
//!               └─ Err(e)      ─ value stays empty ─────► return Err(e)
//! ```
//!
//! ## Guarantees
//!
//! - The factory runs at most once per successful production, no matter how
//!   many threads call concurrently. Callers racing a production block on the
//!   memo's own lock, never on a global one.
//! - Once set, the value is never replaced and is read without locking.
//! - Failures are not cached: the next caller retries from scratch.
//!
//! Constructing a `Memo` has no side effects, so a memo that loses a
//! registration race in [`LazyCache`](crate::cache::LazyCache) can be dropped
//! without its factory ever running.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// Produces the value cached for a key.
///
/// Returning `Ok(None)` violates the contract and makes the memo panic.
/// Closures `Fn(&K) -> Result<Option<V>, E>` implement this trait.
pub trait ValueFactory<K, V> {
    /// Error raised when production fails. Returned to callers unchanged.
    type Error;

    /// Produces the value for `key`.
    fn produce(&self, key: &K) -> Result<Option<V>, Self::Error>;
}

impl<K, V, E, F> ValueFactory<K, V> for F
where
    F: Fn(&K) -> Result<Option<V>, E>,
{
    type Error = E;

    #[inline]
    fn produce(&self, key: &K) -> Result<Option<V>, E> {
        self(key)
    }
}

/// How a value was obtained by [`Memo::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Already realized, either on the fast path or after waiting on the lock.
    Cached,
    /// Produced by this call.
    Produced,
}

/// Lazily computed, compute-once value bound to a key and a factory.
pub struct Memo<K, V, F> {
    key: K,
    factory: Arc<F>,
    value: OnceLock<Arc<V>>,
    lock: Mutex<()>,
}

impl<K, V, F> Memo<K, V, F> {
    /// Creates an unrealized memo. Does not call the factory.
    pub fn new(key: K, factory: Arc<F>) -> Self {
        Self {
            key,
            factory,
            value: OnceLock::new(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the key this memo is bound to.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the realized value, if any. Never produces.
    #[inline]
    pub fn get(&self) -> Option<Arc<V>> {
        self.value.get().cloned()
    }

    /// Returns `true` once a value has been produced.
    #[inline]
    pub fn is_realized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<K, V, F> Memo<K, V, F>
where
    K: fmt::Debug,
    F: ValueFactory<K, V>,
{
    /// Returns the value, producing it first if no caller has yet.
    ///
    /// # Errors
    ///
    /// Returns the factory's error unchanged. The memo stays unrealized and a
    /// later call retries.
    ///
    /// # Panics
    ///
    /// Panics if the factory returns `Ok(None)`.
    pub fn get_or_produce(&self) -> Result<Arc<V>, F::Error> {
        self.resolve().map(|(value, _)| value)
    }

    pub(crate) fn resolve(&self) -> Result<(Arc<V>, Resolution), F::Error> {
        if let Some(value) = self.value.get() {
            return Ok((Arc::clone(value), Resolution::Cached));
        }

        let _guard = self.lock.lock();
        if let Some(value) = self.value.get() {
            return Ok((Arc::clone(value), Resolution::Cached));
        }

        tracing::debug!(key = ?self.key, "producing value");
        let produced = match self.factory.produce(&self.key) {
            Ok(Some(value)) => Arc::new(value),
            Ok(None) => panic!(
                "value factory must not produce an empty value. key=[{:?}]",
                self.key
            ),
            Err(err) => {
                tracing::debug!(key = ?self.key, "value production failed");
                return Err(err);
            },
        };

        // Only the lock holder writes, so the cell is still empty here.
        let value = Arc::clone(self.value.get_or_init(|| produced));
        tracing::debug!(key = ?self.key, "value produced");
        Ok((value, Resolution::Produced))
    }
}

impl<K: fmt::Debug, V, F> fmt::Debug for Memo<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("key", &self.key)
            .field("realized", &self.is_realized())
            .finish_non_exhaustive()
    }
}
