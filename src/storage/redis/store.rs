//! Redis KeyValueStore implementation.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Redis key-value store.
///
/// Values are plain strings, counters use `INCR` and history lists use
/// `RPUSH`/`LRANGE`, so every atomicity guarantee comes from Redis itself.
/// `flush` issues `FLUSHDB` and only clears the database selected by the URL.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., redis://localhost:6379/0)
    pub async fn new(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        info!(url = %url, "Connected to Redis");

        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = conn.set(key, value).await?;

        debug!(key = %key, "Stored value in Redis");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();

        let bytes: Option<Vec<u8>> = conn.get(key).await?;

        debug!(key = %key, found = bytes.is_some(), "Fetched value from Redis");
        Ok(bytes)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(key, 1).await?;

        debug!(key = %key, count, "Incremented counter in Redis");
        Ok(count)
    }

    async fn append(&self, key: &str, value: &str) -> Result<i64> {
        let mut conn = self.conn.clone();

        let len: i64 = conn.rpush(key, value).await?;

        debug!(key = %key, len, "Appended to list in Redis");
        Ok(len)
    }

    async fn range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();

        let items: Vec<Vec<u8>> = conn.lrange(key, start as isize, stop as isize).await?;

        Ok(items)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;

        info!("Flushed Redis database");
        Ok(())
    }
}
