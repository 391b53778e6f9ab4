//! Key-value store abstraction and implementations.
//!
//! The cache never talks to Redis directly. Everything it needs (plain
//! values, counters, append-only lists and a reset) goes through the
//! [`KeyValueStore`] trait, so the same cache and advice run against Redis in
//! production and against [`MemoryStore`] in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StoreConfig, StoreType};
use crate::error::Result;

pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryStore;

#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

/// Byte-oriented key-value store.
///
/// Implementations must make [`incr`](KeyValueStore::incr) and
/// [`append`](KeyValueStore::append) atomic: several caches may share one
/// store and update the same counters and history lists concurrently.
///
/// Implementations:
/// - `RedisStore`: Redis via a multiplexed connection manager
/// - `MemoryStore`: in-process maps, for tests and local runs
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Fetch the raw bytes under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increment the integer counter at `key`.
    ///
    /// An absent key counts as 0, so the first call returns 1.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Atomically push `value` onto the tail of the list at `key`.
    ///
    /// Returns the list length after the push.
    async fn append(&self, key: &str, value: &str) -> Result<i64>;

    /// Read the list at `key` between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end (`-1` is the last element), so
    /// `range(key, 0, -1)` returns the whole list. A missing key is an empty
    /// list.
    async fn range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Delete every key in the current database.
    async fn flush(&self) -> Result<()>;
}

/// Build the store selected by configuration.
pub async fn init_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    info!(store = ?config.store_type, "Initializing key-value store");

    match config.store_type {
        #[cfg(feature = "redis")]
        StoreType::Redis => {
            let store = RedisStore::new(&config.redis.url).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        StoreType::Redis => {
            tracing::error!("Redis store requested but 'redis' feature is not enabled");
            Err(crate::error::CacheError::unavailable(
                "redis feature not enabled",
            ))
        }
        StoreType::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
