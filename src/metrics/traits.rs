//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are kept apart so the cache hot path
//! only ever bumps counters:
//!
//! ```text
//!   ┌──────────────────────────────┐
//!   │     CacheMetricsRecorder     │   written by LazyCache on every get
//!   │  get/register/lose/produce   │
//!   └──────────────┬───────────────┘
//!                  │
//!   Consumption (decoupled from recording):
//!   ┌──────────────▼───────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │───►│ MetricsExporter<S>           │
//!   │ (tests, diagnostics)         │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders take `&self`: every counter is an atomic, so concurrent callers
//! record without any extra locking.

/// Counters recorded by a lazy cache.
pub trait CacheMetricsRecorder {
    fn record_get_call(&self);
    fn record_registration(&self);
    fn record_lost_race(&self);
    fn record_production(&self);
    fn record_production_failure(&self);
    fn record_reset(&self);
}

/// Read a point-in-time snapshot of metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
