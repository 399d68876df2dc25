//! Cache client for query results: fingerprint derivation and fail-open
//! access.
//!
//! # Key Format
//!
//! The fingerprint is the hex SHA-256 digest of the viewport parameters
//! rendered as decimal strings and joined by `:`:
//!
//! ```text
//! sha256("{min_lat}:{min_lng}:{max_lat}:{max_lng}:{zoom_level}")
//! ```
//!
//! The rendering is the exact decimal representation of each bound, so two
//! boxes that are float-equal but render differently (trailing precision
//! from different client libraries) produce different keys. That is a known
//! fragmentation risk, accepted by design; no rounding or quantization is
//! applied.
//!
//! # Degradation
//!
//! Cache availability is never load-bearing. Every fault and every timeout
//! is logged at `warn` and converted into a miss (`get`) or a dropped write
//! (`set`); the caller falls through to the live query path.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::viewport::BoundingBox;

use super::{CacheError, ResultCache};

/// Derive the deterministic cache key for a viewport.
pub fn fingerprint(bbox: &BoundingBox) -> String {
    let raw = format!(
        "{}:{}:{}:{}:{}",
        bbox.min_lat, bbox.min_lng, bbox.max_lat, bbox.max_lng, bbox.zoom_level
    );
    let digest = Sha256::digest(raw.as_bytes());
    format!("{:x}", digest)
}

/// Fail-open cache access for serialized query results.
pub struct QueryCacheClient {
    cache: Arc<dyn ResultCache>,
    op_timeout: Duration,
}

impl QueryCacheClient {
    /// Create a client over a cache provider.
    ///
    /// `op_timeout` bounds each get/set; a hung cache call must not hang
    /// the serving task.
    pub fn new(cache: Arc<dyn ResultCache>, op_timeout: Duration) -> Self {
        Self { cache, op_timeout }
    }

    /// Look up the cached result for a viewport.
    ///
    /// Returns `None` on miss, on expiry, on any cache fault, and on
    /// timeout. Faults are logged, never propagated.
    pub async fn get(&self, bbox: &BoundingBox) -> Option<Vec<u8>> {
        let key = fingerprint(bbox);
        let outcome = tokio::time::timeout(self.op_timeout, self.cache.get(&key)).await;
        match outcome {
            Ok(Ok(Some(bytes))) => {
                debug!(key = %key, bytes = bytes.len(), "cache hit");
                Some(bytes)
            }
            Ok(Ok(None)) => {
                debug!(key = %key, "cache miss");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, key = %key, "cache get failed; bypassing cache");
                None
            }
            Err(_) => {
                let e = CacheError::Timeout(self.op_timeout);
                warn!(error = %e, key = %key, "cache get timed out; bypassing cache");
                None
            }
        }
    }

    /// Store the serialized result for a viewport.
    ///
    /// Write failures are logged and dropped; the response has already been
    /// computed and is returned to the caller regardless.
    pub async fn set(&self, bbox: &BoundingBox, value: Vec<u8>) {
        let key = fingerprint(bbox);
        let outcome = tokio::time::timeout(self.op_timeout, self.cache.set(&key, value)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, key = %key, "cache set failed"),
            Err(_) => {
                let e = CacheError::Timeout(self.op_timeout);
                warn!(error = %e, key = %key, "cache set timed out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{BoxFuture, MemoryResultCache};
    use proptest::prelude::*;

    fn bbox(zoom: u8) -> BoundingBox {
        BoundingBox::new(10.0, 20.0, 10.001, 20.001, zoom)
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint(&bbox(16)), fingerprint(&bbox(16)));
    }

    #[test]
    fn test_fingerprint_sensitive_to_zoom() {
        assert_ne!(fingerprint(&bbox(16)), fingerprint(&bbox(10)));
    }

    #[test]
    fn test_fingerprint_sensitive_to_each_bound() {
        let base = bbox(16);
        let variants = [
            BoundingBox::new(10.1, 20.0, 10.001, 20.001, 16),
            BoundingBox::new(10.0, 20.1, 10.001, 20.001, 16),
            BoundingBox::new(10.0, 20.0, 10.002, 20.001, 16),
            BoundingBox::new(10.0, 20.0, 10.001, 20.002, 16),
        ];
        for variant in variants {
            assert_ne!(fingerprint(&base), fingerprint(&variant));
        }
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let key = fingerprint(&bbox(16));
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    proptest! {
        // Rendering is exact: distinct decimal representations of the
        // bounds always produce distinct keys.
        #[test]
        fn prop_distinct_bounds_distinct_keys(
            a in -90.0f64..90.0,
            b in -90.0f64..90.0,
        ) {
            prop_assume!(a != b);
            let box_a = BoundingBox::new(a, 20.0, 91.0, 20.001, 16);
            let box_b = BoundingBox::new(b, 20.0, 91.0, 20.001, 16);
            prop_assert_ne!(fingerprint(&box_a), fingerprint(&box_b));
        }
    }

    /// A cache that always fails, for degradation tests.
    struct FailingCache;

    impl ResultCache for FailingCache {
        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
            Box::pin(async { Err(CacheError::Unavailable("connection refused".into())) })
        }

        fn set(&self, _key: &str, _value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
            Box::pin(async { Err(CacheError::Unavailable("connection refused".into())) })
        }
    }

    /// A cache that never completes, for timeout tests.
    struct HangingCache;

    impl ResultCache for HangingCache {
        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
            Box::pin(async {
                std::future::pending::<()>().await;
                unreachable!()
            })
        }

        fn set(&self, _key: &str, _value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
            Box::pin(async {
                std::future::pending::<()>().await;
                unreachable!()
            })
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_provider() {
        let client = QueryCacheClient::new(
            Arc::new(MemoryResultCache::default()),
            Duration::from_secs(1),
        );
        let viewport = bbox(16);

        assert!(client.get(&viewport).await.is_none());
        client.set(&viewport, vec![1, 2, 3]).await;
        assert_eq!(client.get(&viewport).await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_unavailable_cache_degrades_to_miss() {
        let client = QueryCacheClient::new(Arc::new(FailingCache), Duration::from_secs(1));
        let viewport = bbox(16);

        assert!(client.get(&viewport).await.is_none());
        // Set must not panic or propagate.
        client.set(&viewport, vec![1]).await;
    }

    #[tokio::test]
    async fn test_hung_cache_times_out_to_miss() {
        let client = QueryCacheClient::new(Arc::new(HangingCache), Duration::from_millis(20));
        let viewport = bbox(16);

        assert!(client.get(&viewport).await.is_none());
        client.set(&viewport, vec![1]).await;
    }
}
