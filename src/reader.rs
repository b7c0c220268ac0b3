//! Draining record sources into replayable snapshots.
//!
//! A [`RecordSource`] hands out one record per call for a `(category,
//! request id)` pair and signals the end of its data with an error that
//! [`RecordSource::is_exhausted`] recognizes. [`drain`] collects everything up
//! to that signal; [`ReplayFactory`] runs the drain inside a memo so each key
//! is read exactly once, then freezes the result into a [`CyclicIter`].
//!
//! ```text
//!   read_one ─► Ok(r1) ─► Ok(r2) ─► Ok(r3) ─► Err(exhausted) ─► Ok([r1, r2, r3])
//!   read_one ─► Ok(r1) ─► Err(other) ─────────────────────────► Err(other)
//! ```
//!
//! [`RepeatReader`] is the bounded counterpart used when a fixed number of
//! reads should be served from a snapshot before it reports the end.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ds::CyclicIter;
use crate::key::CacheKey;
use crate::memo::ValueFactory;

/// Text carried by a source's error once it has no more records for a key.
pub const EXHAUSTED_MARKER: &str = "receive message did not exists";

/// Supplies records one at a time for a category and request id.
pub trait RecordSource<C> {
    /// Record type produced by the source.
    type Record;
    /// Error raised by the source, including the exhaustion signal.
    type Error: Error;

    /// Reads the next record for `(category, request_id)`.
    fn read_one(&self, category: &C, request_id: &str) -> Result<Self::Record, Self::Error>;

    /// Returns `true` if `err` signals that no records remain.
    ///
    /// The default looks for [`EXHAUSTED_MARKER`] in the error's message.
    fn is_exhausted(&self, err: &Self::Error) -> bool {
        err.to_string().contains(EXHAUSTED_MARKER)
    }
}

/// Reads every record `source` has for `key`.
///
/// # Errors
///
/// Any error other than the exhaustion signal aborts the drain and is
/// returned unchanged; records read before it are discarded.
pub fn drain<C, S>(source: &S, key: &CacheKey<C>) -> Result<Vec<S::Record>, S::Error>
where
    S: RecordSource<C> + ?Sized,
{
    let mut records = Vec::new();
    loop {
        match source.read_one(key.category(), key.request_id()) {
            Ok(record) => {
                records.push(record);
                tracing::trace!(%key, read = records.len(), "read record");
            },
            Err(err) if source.is_exhausted(&err) => {
                tracing::debug!(%key, records = records.len(), "source exhausted");
                return Ok(records);
            },
            Err(err) => return Err(err),
        }
    }
}

/// Factory that drains a [`RecordSource`] and wraps the records in a
/// [`CyclicIter`].
pub struct ReplayFactory<S> {
    source: S,
}

impl<S> ReplayFactory<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<C, S> ValueFactory<CacheKey<C>, CyclicIter<S::Record>> for ReplayFactory<S>
where
    S: RecordSource<C>,
{
    type Error = S::Error;

    fn produce(&self, key: &CacheKey<C>) -> Result<Option<CyclicIter<S::Record>>, S::Error> {
        let records = drain(&self.source, key)?;
        Ok(Some(CyclicIter::new(records)))
    }
}

impl<S> fmt::Debug for ReplayFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayFactory").finish_non_exhaustive()
    }
}

/// Serves up to `limit` reads from a cyclic snapshot, then reports the end.
///
/// Safe to share between threads: the read count is atomic and each read
/// takes the next cyclic element.
#[derive(Debug)]
pub struct RepeatReader<T> {
    iter: CyclicIter<T>,
    reads: AtomicUsize,
    limit: usize,
}

impl<T> RepeatReader<T> {
    /// Creates a reader over `records` that serves at most `limit` reads.
    pub fn new(records: Vec<T>, limit: usize) -> Self {
        Self {
            iter: CyclicIter::new(records),
            reads: AtomicUsize::new(0),
            limit,
        }
    }

    /// Returns the next record, or `None` once `limit` reads were served.
    pub fn read(&self) -> Option<&T> {
        let previous = self.reads.fetch_add(1, Ordering::AcqRel);
        if previous < self.limit {
            self.iter.next()
        } else {
            None
        }
    }

    /// Returns `true` while fewer than `limit` reads have been served.
    pub fn has_next(&self) -> bool {
        self.reads.load(Ordering::Acquire) < self.limit
    }

    /// Rewinds the snapshot. The read budget is not restored.
    pub fn close(&self) {
        self.iter.reset();
    }

    /// Maximum number of reads served.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
