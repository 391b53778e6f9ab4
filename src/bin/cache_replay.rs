//! cache-replay: print the recorded call history of one operation
//!
//! Usage: `cache-replay [OPERATION]` (default: `Cache.store`)
//!
//! Connects without flushing, so it can inspect history written by other
//! processes sharing the same store.
//!
//! ## Configuration
//! Same sources as `cache-demo` (CACHE_CONFIG, CACHE__STORE__*, CACHE_LOG).

use redis_cache::config::Config;
use redis_cache::storage::init_store;
use redis_cache::utils::bootstrap::init_tracing;
use redis_cache::{Cache, ReplayReporter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let operation = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Cache::STORE_OPERATION.to_string());

    let config = Config::load(None)?;
    let store = init_store(&config.store).await?;

    let report = ReplayReporter::new(store).replay(&operation).await?;
    if report.unmatched_inputs > 0 {
        eprintln!(
            "warning: {} call(s) of {} recorded no output",
            report.unmatched_inputs, operation
        );
    }

    Ok(())
}
