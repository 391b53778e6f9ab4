//! In-memory KeyValueStore implementation.
//!
//! Mirrors the subset of Redis semantics the cache relies on: string values,
//! integer counters, append-only lists with inclusive (possibly negative)
//! ranges, and a full reset. Used for tests and for the `memory` store type.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

/// What a key holds. Mixing kinds on one key fails the way Redis does.
#[derive(Debug, Clone)]
enum Entry {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
}

/// Store that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    fail_on_set: RwLock<bool>,
    unavailable: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set` fail while counters and lists keep working.
    pub async fn set_fail_on_set(&self, fail: bool) {
        *self.fail_on_set.write().await = fail;
    }

    /// Make every operation fail as if the server went away.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Number of keys currently held.
    pub async fn key_count(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn check_available(&self) -> Result<()> {
        if *self.unavailable.read().await {
            return Err(CacheError::unavailable("memory store marked unavailable"));
        }
        Ok(())
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::unavailable(format!(
        "WRONGTYPE operation against key {key} holding the wrong kind of value"
    ))
}

/// Resolve an inclusive, possibly negative, index pair against a list length.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let stop = if stop < 0 { stop + len } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.check_available().await?;
        if *self.fail_on_set.read().await {
            return Err(CacheError::unavailable("memory store rejected set"));
        }

        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry::Value(value));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_available().await?;

        match self.entries.read().await.get(key) {
            Some(Entry::Value(bytes)) => Ok(Some(bytes.clone())),
            Some(Entry::List(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.check_available().await?;

        let mut entries = self.entries.write().await;
        let current = match entries.get(key) {
            Some(Entry::Value(bytes)) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::unavailable(format!(
                        "value at {key} is not an integer or out of range"
                    ))
                })?,
            Some(Entry::List(_)) => return Err(wrong_type(key)),
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::unavailable(format!("increment of {key} would overflow")))?;
        entries.insert(key.to_string(), Entry::Value(next.to_string().into_bytes()));
        Ok(next)
    }

    async fn append(&self, key: &str, value: &str) -> Result<i64> {
        self.check_available().await?;

        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));

        match entry {
            Entry::List(items) => {
                items.push(value.as_bytes().to_vec());
                Ok(items.len() as i64)
            }
            Entry::Value(_) => Err(wrong_type(key)),
        }
    }

    async fn range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.check_available().await?;

        match self.entries.read().await.get(key) {
            Some(Entry::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(Entry::Value(_)) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn flush(&self) -> Result<()> {
        self.check_available().await?;

        self.entries.write().await.clear();
        Ok(())
    }
}
