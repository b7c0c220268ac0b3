//! Lock-free wrap-around counter.
//!
//! ## Architecture
//!
//! ```text
//!   CyclicCounter { current: AtomicUsize, max: 2 }
//!
//!   get_and_advance():  0 → 1 → 2 → 0 → 1 → 2 → 0 ...
//!
//!   loop {
//!       cur  = current.load()
//!       next = if cur < max { cur + 1 } else { 0 }
//!       if CAS(current, cur → next) succeeds { return cur }
//!   }
//! ```
//!
//! ## Properties
//!
//! - Every returned value lies in `[0, max]`.
//! - Returned values follow the total order of successful CAS operations, so
//!   no two concurrent callers observe the same step.
//! - Never blocks; a failed CAS only means another caller advanced first.
//!
//! ## Example Usage
//!
//! ```
//! use replaykit::ds::CyclicCounter;
//!
//! let counter = CyclicCounter::new(2);
//! let seen: Vec<_> = (0..6).map(|_| counter.get_and_advance()).collect();
//! assert_eq!(seen, [0, 1, 2, 0, 1, 2]);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

/// Thread-safe counter that yields `0..=max` repeatedly.
#[derive(Debug)]
pub struct CyclicCounter {
    current: AtomicUsize,
    max: usize,
}

impl CyclicCounter {
    /// Creates a counter starting at 0 that wraps after `max`.
    pub fn new(max: usize) -> Self {
        Self {
            current: AtomicUsize::new(0),
            max,
        }
    }

    /// Returns the largest value the counter yields before wrapping.
    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns the current value and advances, wrapping to 0 after `max`.
    pub fn get_and_advance(&self) -> usize {
        let mut current = self.current.load(Ordering::Acquire);
        loop {
            let next = if current < self.max { current + 1 } else { 0 };
            match self.current.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return current,
                Err(actual) => current = actual,
            }
        }
    }

    /// Rewinds the counter to 0.
    ///
    /// Advances that started before the reset may still land afterwards, so a
    /// precise restart is only observed once in-flight callers have returned.
    pub fn reset(&self) {
        self.current.store(0, Ordering::Release);
    }
}
