pub mod cyclic_counter;
pub mod cyclic_iter;
pub mod shard;

pub use cyclic_counter::CyclicCounter;
pub use cyclic_iter::{CyclicIter, Rewind};
pub use shard::ShardSelector;
