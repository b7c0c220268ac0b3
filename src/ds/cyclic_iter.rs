//! Infinite, thread-safe round-robin view over an immutable snapshot.
//!
//! [`CyclicIter`] owns a frozen list and a [`CyclicCounter`] sized to it.
//! Every call to [`next`](CyclicIter::next) hands out the element at the next
//! counter step, so concurrent readers share one replay position and the
//! sequence wraps back to the first element after the last one.
//!
//! ```text
//!   snapshot: [a, b, c]      counter max = 2
//!
//!   next() → a   (0)
//!   next() → b   (1)
//!   next() → c   (2)
//!   next() → a   (0)  wrapped
//! ```
//!
//! An empty snapshot never indexes: `next()` returns `None` on every call.

use crate::ds::cyclic_counter::CyclicCounter;
use crate::error::UnsupportedOperation;

/// Round-robin replay over a fixed list of elements.
#[derive(Debug)]
pub struct CyclicIter<T> {
    snapshot: Box<[T]>,
    index: CyclicCounter,
}

impl<T> CyclicIter<T> {
    /// Freezes `contents` and positions the replay at its first element.
    pub fn new(contents: Vec<T>) -> Self {
        let last_index = contents.len().saturating_sub(1);
        Self {
            snapshot: contents.into_boxed_slice(),
            index: CyclicCounter::new(last_index),
        }
    }

    /// Always `true`: the sequence never terminates, even when empty.
    #[inline]
    pub fn has_next(&self) -> bool {
        true
    }

    /// Returns the next element in the cycle, or `None` if the snapshot is
    /// empty.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<&T> {
        if self.snapshot.is_empty() {
            return None;
        }
        let slot = self.index.get_and_advance();
        self.snapshot.get(slot)
    }

    /// Removal is not supported; the snapshot is read-only.
    pub fn remove(&self) -> Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation::new("remove"))
    }

    /// Rewinds the replay position to the first element.
    pub fn reset(&self) {
        self.index.reset();
    }

    /// Number of elements in the snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns `true` if the snapshot holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Returns the frozen snapshot in its original order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.snapshot
    }
}

impl<T> From<Vec<T>> for CyclicIter<T> {
    fn from(contents: Vec<T>) -> Self {
        Self::new(contents)
    }
}

/// Values whose replay position can be rewound in place.
///
/// [`LazyCache::reset_all`](crate::cache::LazyCache::reset_all) calls this on
/// every realized entry.
pub trait Rewind {
    /// Rewinds to the start without rebuilding the underlying data.
    fn rewind(&self);
}

impl<T> Rewind for CyclicIter<T> {
    fn rewind(&self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_in_order() {
        let iter = CyclicIter::new(vec![1, 2, 3]);
        assert!(iter.has_next());
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert!(iter.has_next());
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert!(iter.has_next());
    }

    #[test]
    fn two_elements_alternate() {
        let iter = CyclicIter::new(vec!["a", "b"]);
        let seen: Vec<_> = (0..6).map(|_| *iter.next().unwrap()).collect();
        assert_eq!(seen, ["a", "b", "a", "b", "a", "b"]);
    }

    #[test]
    fn single_element_repeats() {
        let iter = CyclicIter::new(vec!["only"]);
        for _ in 0..4 {
            assert_eq!(iter.next(), Some(&"only"));
        }
    }

    #[test]
    fn empty_yields_none_forever() {
        let iter: CyclicIter<u8> = CyclicIter::new(Vec::new());
        assert!(iter.is_empty());
        for _ in 0..5 {
            assert!(iter.has_next());
            assert_eq!(iter.next(), None);
        }
    }

    #[test]
    fn remove_is_unsupported() {
        let iter = CyclicIter::new(vec![1]);
        let err = iter.remove().unwrap_err();
        assert_eq!(err.operation(), "remove");
        assert_eq!(iter.len(), 1);
    }

    #[test]
    fn reset_returns_first_element_again() {
        let iter = CyclicIter::new(vec!['x', 'y', 'z']);
        let first = *iter.next().unwrap();
        iter.next();
        iter.reset();
        assert_eq!(iter.next(), Some(&first));
    }

    #[test]
    fn rewind_delegates_to_reset() {
        let iter = CyclicIter::from(vec![10, 20]);
        iter.next();
        Rewind::rewind(&iter);
        assert_eq!(iter.next(), Some(&10));
        assert_eq!(iter.as_slice(), &[10, 20]);
    }

    #[test]
    fn iter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CyclicIter<String>>();
    }

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Any `len` consecutive calls visit every element once, in order.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_window_visits_each_element(
                items in prop::collection::vec(any::<u16>(), 1..32),
                rounds in 1usize..5
            ) {
                let iter = CyclicIter::new(items.clone());
                for _ in 0..rounds {
                    for item in &items {
                        prop_assert_eq!(iter.next(), Some(item));
                    }
                }
            }
        }
    }
}
