//! cache-demo: exercise the instrumented cache end to end
//!
//! Builds a cache from configuration (flushing the store unless
//! `store.flush_on_connect` is false), stores a few values, reads them back
//! and replays the recorded calls.
//!
//! ## Configuration
//! - CACHE_CONFIG: Path to a YAML config file (optional)
//! - CACHE__STORE__TYPE: `redis` (default) or `memory`
//! - CACHE__STORE__REDIS__URL: Redis URL (default: redis://127.0.0.1:6379)
//! - CACHE_LOG: Log filter (default: info)

use tracing::info;

use redis_cache::config::Config;
use redis_cache::utils::bootstrap::init_tracing;
use redis_cache::Cache;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    let cache = Cache::from_config(&config).await?;

    info!(store = ?config.store.store_type, "cache-demo started");

    let text_key = cache.store("foo").await?;
    let int_key = cache.store(123).await?;
    let float_key = cache.store(2.5).await?;
    let bytes_key = cache.store(b"bar".to_vec()).await?;

    println!("{} -> {:?}", text_key, cache.retrieve_text(&text_key).await?);
    println!("{} -> {:?}", int_key, cache.retrieve_integer(&int_key).await?);
    println!("{} -> {:?}", float_key, cache.retrieve_float(&float_key).await?);
    println!("{} -> {:?}", bytes_key, cache.retrieve(&bytes_key).await?);
    println!("missing -> {:?}", cache.retrieve_text("missing").await?);
    println!(
        "{} count: {}",
        Cache::STORE_OPERATION,
        cache.call_count(Cache::STORE_OPERATION).await?
    );

    cache.reporter().replay(Cache::STORE_OPERATION).await?;

    Ok(())
}
