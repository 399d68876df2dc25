//! Service configuration.
//!
//! All tunables live in explicit structs passed to constructors; there are
//! no process-wide singletons. Threshold, labels, and TTL are configuration,
//! not code branches: the historical cached/uncached service variants are
//! expressed by swapping [`ZoomPolicy`] presets and cache settings on one
//! engine.

use std::time::Duration;

use crate::cache::{DEFAULT_MAX_SIZE_BYTES, DEFAULT_TTL};
use crate::policy::ZoomPolicy;
use crate::query::DEFAULT_OP_TIMEOUT;

/// Default ingest batch size; a throughput tunable, not a correctness
/// property.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Result cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Fixed entry TTL, independent of query cost or zoom level.
    pub ttl: Duration,
    /// Byte-weighted capacity of the in-memory provider.
    pub max_size_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

/// Batch ingest settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Records per `insert_batch` call.
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Top-level configuration for the serving stack.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Filtering and classification policy.
    pub policy: ZoomPolicy,
    /// Result cache settings.
    pub cache: CacheConfig,
    /// Bound on each store/cache operation.
    pub op_timeout: Duration,
    /// Batch ingest settings.
    pub ingest: IngestConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            policy: ZoomPolicy::default(),
            cache: CacheConfig::default(),
            op_timeout: DEFAULT_OP_TIMEOUT,
            ingest: IngestConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Replace the zoom policy.
    pub fn with_policy(mut self, policy: ZoomPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    /// Set the operation timeout.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Set the ingest batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.ingest.batch_size = batch_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert_eq!(config.ingest.batch_size, 1000);
        assert_eq!(config.policy.speed_threshold, 30.0);
        assert_eq!(config.policy.detail_zoom, 15);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServiceConfig::default()
            .with_policy(ZoomPolicy::speeding())
            .with_cache_ttl(Duration::from_secs(60))
            .with_op_timeout(Duration::from_secs(2))
            .with_batch_size(250);

        assert_eq!(config.policy.speed_threshold, 46.0);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.op_timeout, Duration::from_secs(2));
        assert_eq!(config.ingest.batch_size, 250);
    }
}
