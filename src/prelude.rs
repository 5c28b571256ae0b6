pub use crate::builder::{Cache, CacheBuilder, CacheConfig, CachePolicy};
pub use crate::ds::{FrequencyBuckets, IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CoreCache, LfuCacheTrait, LruCacheTrait};
