//! Composite cache keys for replayed record lists.
//!
//! A [`CacheKey`] combines a data category and a request identifier. Identity
//! is the composed string `"{category}_{request_id}"`: equality, hashing and
//! `Display` all go through it, so two keys whose parts differ but compose to
//! the same string are the same key.
//!
//! ```
//! use replaykit::key::{CacheKey, DataType};
//!
//! let a = CacheKey::new(DataType::ResponseBodyMessages, "RM11AC0101");
//! let b = CacheKey::new(DataType::ResponseBodyMessages, "RM11AC0101");
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "RESPONSE_BODY_MESSAGES_RM11AC0101");
//! ```
//!
//! ## Collisions
//!
//! No separator escaping is performed. `("A_b", "c")` and `("A", "b_c")`
//! compose to `"A_b_c"` and compare equal. Callers that need disjoint key
//! spaces must choose category names that cannot end where a request id
//! begins.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Immutable key made of a category and a request id.
#[derive(Clone)]
pub struct CacheKey<C> {
    category: C,
    request_id: String,
    composed: String,
}

impl<C: fmt::Display> CacheKey<C> {
    /// Creates a key from its parts.
    pub fn new(category: C, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        let composed = format!("{}_{}", category, request_id);
        Self {
            category,
            request_id,
            composed,
        }
    }
}

impl<C> CacheKey<C> {
    /// Returns the category part.
    #[inline]
    pub fn category(&self) -> &C {
        &self.category
    }

    /// Returns the request id part.
    #[inline]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the composed `category_requestid` string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.composed
    }
}

impl<C> PartialEq for CacheKey<C> {
    fn eq(&self, other: &Self) -> bool {
        self.composed == other.composed
    }
}

impl<C> Eq for CacheKey<C> {}

impl<C> Hash for CacheKey<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.composed.hash(state);
    }
}

impl<C> fmt::Display for CacheKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed)
    }
}

impl<C> fmt::Debug for CacheKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.composed).finish()
    }
}

/// Categories of replayable test data.
///
/// Request messages are what an outgoing simulator sends; response messages
/// are what an incoming simulator answers with. Each has a header part and a
/// body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    ExpectedRequestHeaderMessages,
    ExpectedRequestBodyMessages,
    ResponseHeaderMessages,
    ResponseBodyMessages,
}

impl DataType {
    /// Returns the upper-snake name used when composing keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::ExpectedRequestHeaderMessages => "EXPECTED_REQUEST_HEADER_MESSAGES",
            DataType::ExpectedRequestBodyMessages => "EXPECTED_REQUEST_BODY_MESSAGES",
            DataType::ResponseHeaderMessages => "RESPONSE_HEADER_MESSAGES",
            DataType::ResponseBodyMessages => "RESPONSE_BODY_MESSAGES",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
