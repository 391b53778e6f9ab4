//! Redis Cache - instrumented key-value caching
//!
//! Stores values under random keys in an external key-value store, counts
//! and records every store call through composable advice, and replays the
//! recorded history.
//!
//! ```text
//! Cache::store(data)
//!   └─ CountCalls      INCR  Cache.store
//!       └─ RecordHistory  RPUSH Cache.store:inputs / Cache.store:outputs
//!           └─ SET <uuid> data
//! ```

pub mod advice;
pub mod cache;
pub mod config;
pub mod error;
pub mod replay;
pub mod storage;
pub mod utils;

pub use cache::{Cache, CallHistory, Value};
pub use error::{CacheError, Result};
pub use replay::{ReplayReport, ReplayReporter};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(feature = "redis")]
pub use storage::RedisStore;
