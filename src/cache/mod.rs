//! Instrumented cache over a key-value store.
//!
//! [`Cache::store`] writes a value under a fresh random key and runs through
//! the advice chain, so every call is counted and its inputs/outputs are
//! logged. Retrieval is plain: raw bytes, or bytes passed through a decoder.

mod value;

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::advice::{
    decode_args, decode_output, inputs_key, outputs_key, AdviceChain, CallFuture, CountCalls,
    Invocation, RecordHistory,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::replay::ReplayReporter;
use crate::storage::{init_store, KeyValueStore};

pub use value::{decode_float, decode_integer, decode_text, render_args, Value};

/// Recorded calls of one operation, in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallHistory {
    pub inputs: Vec<Vec<Value>>,
    pub outputs: Vec<Value>,
}

/// Key-value cache with call counting and call history on `store`.
///
/// Holds no state of its own beyond a store handle: records, counters and
/// history all live in the store and outlive the cache.
///
/// # Example
///
/// ```ignore
/// let cache = Cache::new(Arc::new(MemoryStore::new())).await?;
///
/// let key = cache.store("foo").await?;
/// assert_eq!(cache.retrieve_text(&key).await?, Some("foo".to_string()));
/// assert_eq!(cache.call_count(Cache::STORE_OPERATION).await?, 1);
/// ```
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    advice: AdviceChain,
}

impl Cache {
    /// Qualified name of [`store`](Cache::store). Also the counter key and the
    /// prefix of its history lists.
    pub const STORE_OPERATION: &'static str = "Cache.store";

    /// Create a cache and flush the store.
    ///
    /// Flushing wipes every key in the store's current database, including
    /// counters and history left by earlier runs. Use
    /// [`without_reset`](Cache::without_reset) to attach to a store whose
    /// contents must survive.
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.flush().await?;
        info!("Flushed key-value store for new cache");
        Ok(Self::without_reset(store))
    }

    /// Create a cache over `store` without touching existing data.
    pub fn without_reset(store: Arc<dyn KeyValueStore>) -> Self {
        let advice = AdviceChain::new()
            .with(CountCalls::new(Arc::clone(&store)))
            .with(RecordHistory::new(Arc::clone(&store)));
        Self { store, advice }
    }

    /// Create a cache from configuration.
    ///
    /// Flushes the store unless `store.flush_on_connect` is disabled.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = init_store(&config.store).await?;
        if config.store.flush_on_connect {
            Self::new(store).await
        } else {
            Ok(Self::without_reset(store))
        }
    }

    /// Store `data` under a new random key and return the key.
    ///
    /// Counted under [`STORE_OPERATION`](Cache::STORE_OPERATION) and recorded
    /// in its history. If the write fails the count and the input entry stay
    /// behind, but no output is recorded.
    pub async fn store(&self, data: impl Into<Value>) -> Result<String> {
        let args = [data.into()];
        let key = Uuid::new_v4().to_string();

        let call = Invocation::new(Self::STORE_OPERATION, &args);
        let target: CallFuture<'_> = Box::pin(self.write(&key, &args[0]));

        match self.advice.invoke(&call, target).await? {
            Value::Text(key) => Ok(key),
            other => Err(CacheError::Internal(format!(
                "store produced a non-text key: {}",
                other.repr()
            ))),
        }
    }

    async fn write(&self, key: &str, data: &Value) -> Result<Value> {
        self.store.set(key, data.to_bytes()).await?;
        Ok(Value::Text(key.to_string()))
    }

    /// Fetch the raw bytes stored under `key`.
    pub async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Fetch `key` and convert it with `decoder`.
    ///
    /// The decoder only runs when the key exists. Its errors propagate as-is;
    /// nothing checks up front that the decoder suits the stored bytes.
    pub async fn retrieve_with<T, F>(&self, key: &str, decoder: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T> + Send,
        T: Send,
    {
        self.store.get(key).await?.map(decoder).transpose()
    }

    /// Fetch `key` as UTF-8 text. Invalid UTF-8 is a `Decode` error.
    pub async fn retrieve_text(&self, key: &str) -> Result<Option<String>> {
        self.retrieve_with(key, decode_text).await
    }

    /// Fetch `key` as a base-10 integer. Non-numeric content is a `Format` error.
    pub async fn retrieve_integer(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve_with(key, decode_integer).await
    }

    /// Fetch `key` as a float. Non-numeric content is a `Format` error.
    pub async fn retrieve_float(&self, key: &str) -> Result<Option<f64>> {
        self.retrieve_with(key, decode_float).await
    }

    /// Number of recorded calls of `operation`, 0 if it was never called.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        Ok(self
            .retrieve_with(operation, decode_integer)
            .await?
            .unwrap_or(0))
    }

    /// Decoded call history of `operation`.
    pub async fn history(&self, operation: &str) -> Result<CallHistory> {
        let inputs = self
            .store
            .range(&inputs_key(operation), 0, -1)
            .await?
            .iter()
            .map(|entry| decode_args(entry))
            .collect::<Result<Vec<_>>>()?;
        let outputs = self
            .store
            .range(&outputs_key(operation), 0, -1)
            .await?
            .iter()
            .map(|entry| decode_output(entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(CallHistory { inputs, outputs })
    }

    /// Replay reporter reading from this cache's store.
    pub fn reporter(&self) -> ReplayReporter {
        ReplayReporter::new(Arc::clone(&self.store))
    }
}
