pub mod clock;
pub mod kv_store;

pub use clock::{format_submission_time, Clock, FixedClock, SystemClock};
pub use kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
