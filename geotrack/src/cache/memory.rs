//! In-memory cache provider using moka.
//!
//! moka's future-aware cache is lock-free on the read path and applies TTL
//! expiry without a background sweeper thread, which keeps the cache safe to
//! call from request tasks without blocking the runtime.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::{BoxFuture, CacheError, ResultCache};

/// Default entry TTL: one hour, matching the serving design's staleness
/// contract.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default capacity: 256 MB of serialized result documents.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 256 * 1024 * 1024;

/// In-memory `ResultCache` provider with TTL expiry and byte-weighted
/// capacity.
pub struct MemoryResultCache {
    cache: MokaCache<String, Vec<u8>>,
}

impl MemoryResultCache {
    /// Create a provider with the given TTL and capacity.
    pub fn new(ttl: Duration, max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Current number of entries. Eventually consistent; intended for
    /// diagnostics and tests.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Run pending maintenance (expiry, eviction) synchronously.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for MemoryResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_SIZE_BYTES)
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }
}
