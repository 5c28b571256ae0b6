pub mod frequency_buckets;
pub mod intrusive_list;
pub mod slot_arena;

pub use frequency_buckets::{DEFAULT_BUCKET_PREALLOC, FrequencyBucketIter, FrequencyBuckets};
pub use intrusive_list::{IntrusiveList, IntrusiveListIdIter, IntrusiveListIter};
pub use slot_arena::{SlotArena, SlotId};
