pub use crate::builder::{CacheBuilder, MAX_SHARDS};
pub use crate::cache::LazyCache;
pub use crate::ds::{CyclicCounter, CyclicIter, Rewind};
pub use crate::error::{ConfigError, UnsupportedOperation};
pub use crate::key::{CacheKey, DataType};
pub use crate::memo::{Memo, ValueFactory};
#[cfg(feature = "metrics")]
pub use crate::metrics::{
    CacheMetricsSnapshot, MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter,
};
pub use crate::reader::{EXHAUSTED_MARKER, RecordSource, ReplayFactory, RepeatReader, drain};
pub use crate::replay::ReplayCache;
