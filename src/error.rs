//! Error types for the replaykit library.
//!
//! ## Types
//!
//! - [`ConfigError`]: a builder rejected its settings (zero shards, too many
//!   shards).
//! - [`UnsupportedOperation`]: Returned when a caller tries to mutate a
//!   read-only replay sequence.
//!
//! Production failures are never wrapped: [`LazyCache::get`](crate::cache::LazyCache::get)
//! hands back the factory's own error type unchanged.
//!
//! ## Example
//!
//! ```
//! use replaykit::builder::CacheBuilder;
//! use replaykit::error::ConfigError;
//!
//! let factory = |key: &u32| Ok::<_, std::convert::Infallible>(Some(*key * 2));
//! let bad = CacheBuilder::new().shards(0).try_build(factory);
//! let err: ConfigError = bad.err().unwrap();
//! assert!(err.to_string().contains("shard"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A [`CacheBuilder`](crate::builder::CacheBuilder) setting failed
/// validation. The message names the offending setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Wraps a description of the rejected setting.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The description passed to [`new`](Self::new).
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// UnsupportedOperation
// ---------------------------------------------------------------------------

/// Error returned when an operation is not supported by the receiver.
///
/// [`CyclicIter`](crate::ds::CyclicIter) is read-only, so its `remove`
/// always fails with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedOperation {
    operation: &'static str,
}

impl UnsupportedOperation {
    /// Creates an error for the named operation.
    #[inline]
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// Returns the name of the rejected operation.
    #[inline]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation not supported: {}", self.operation)
    }
}

impl std::error::Error for UnsupportedOperation {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
