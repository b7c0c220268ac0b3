/// Point-in-time view of a lazy cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub registrations: u64, // memos that won the insert-if-absent
    pub lost_races: u64,    // memos built by a racer and dropped unused
    pub productions: u64,
    pub production_failures: u64,
    pub resets: u64,

    // gauges captured at snapshot time
    pub entries: usize,
    pub realized: usize,
}

impl CacheMetricsSnapshot {
    /// Entries registered but not yet successfully produced.
    pub fn pending(&self) -> usize {
        self.entries.saturating_sub(self.realized)
    }
}
