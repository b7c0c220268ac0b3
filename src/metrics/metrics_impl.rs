use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::CacheMetricsRecorder;

/// Atomic counters shared by all callers of one cache.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    get_calls: AtomicU64,
    registrations: AtomicU64,
    lost_races: AtomicU64,
    productions: AtomicU64,
    production_failures: AtomicU64,
    resets: AtomicU64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the counters together with gauges measured by the caller.
    pub fn snapshot(&self, entries: usize, realized: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            lost_races: self.lost_races.load(Ordering::Relaxed),
            productions: self.productions.load(Ordering::Relaxed),
            production_failures: self.production_failures.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            entries,
            realized,
        }
    }
}

impl CacheMetricsRecorder for CacheMetrics {
    #[inline]
    fn record_get_call(&self) {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_lost_race(&self) {
        self.lost_races.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_production(&self) {
        self.productions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_production_failure(&self) {
        self.production_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}
