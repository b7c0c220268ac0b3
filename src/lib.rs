//! replaykit: compute-once concurrent caches that replay their values
//! round-robin.
//!
//! The building blocks, bottom-up:
//!
//! - [`ds::CyclicCounter`] and [`ds::CyclicIter`]: lock-free wrap-around
//!   index and the read-only replay buffer built on it.
//! - [`memo::Memo`]: single-flight production of one key's value.
//! - [`cache::LazyCache`]: sharded map of memos with first-writer-wins
//!   registration.
//! - [`reader`]: draining a [`reader::RecordSource`] until it reports
//!   exhaustion.
//! - [`replay::ReplayCache`]: the facade tying a record source to a lazy cache
//!   of cyclic iterators.

pub mod builder;
pub mod cache;
pub mod ds;
pub mod error;
pub mod key;
pub mod memo;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod reader;
pub mod replay;
