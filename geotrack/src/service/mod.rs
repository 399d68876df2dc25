//! Serving façade: cache layer over the query engine.
//!
//! One entry point, [`TrackService::gps_points`], implements the full read
//! path: validate → fingerprint → cache lookup → (miss) live query →
//! cache store → respond. The cache hit path makes no store call; it is the
//! single suspend point that can be skipped entirely.
//!
//! Cache faults never fail a request. The only errors a caller sees are the
//! client's own invalid box and a genuine store fault.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{MemoryResultCache, QueryCacheClient, ResultCache};
use crate::config::ServiceConfig;
use crate::query::{QueryEngine, QueryError};
use crate::record::FeatureCollection;
use crate::store::SpatialStore;
use crate::viewport::BoundingBox;

/// Cached bounding-box query service over a spatial store.
pub struct TrackService {
    engine: QueryEngine,
    cache: QueryCacheClient,
}

impl TrackService {
    /// Build a service with the default in-memory result cache.
    pub fn new(store: Arc<dyn SpatialStore>, config: ServiceConfig) -> Self {
        let provider = Arc::new(MemoryResultCache::new(
            config.cache.ttl,
            config.cache.max_size_bytes,
        ));
        Self::with_cache(store, provider, config)
    }

    /// Build a service over an explicit cache provider.
    pub fn with_cache(
        store: Arc<dyn SpatialStore>,
        cache: Arc<dyn ResultCache>,
        config: ServiceConfig,
    ) -> Self {
        info!(
            speed_threshold = config.policy.speed_threshold,
            detail_zoom = config.policy.detail_zoom,
            cache_ttl_secs = config.cache.ttl.as_secs(),
            "track service configured"
        );
        Self {
            engine: QueryEngine::new(store, config.policy, config.op_timeout),
            cache: QueryCacheClient::new(cache, config.op_timeout),
        }
    }

    /// Serve one bounding-box query, memoized per viewport fingerprint.
    pub async fn gps_points(&self, bbox: &BoundingBox) -> Result<FeatureCollection, QueryError> {
        // Validation happens before the cache as well as before the store;
        // an invalid box must not touch either.
        bbox.validate()?;

        if let Some(bytes) = self.cache.get(bbox).await {
            match serde_json::from_slice(&bytes) {
                Ok(collection) => return Ok(collection),
                Err(e) => {
                    // Treat a corrupt entry as a miss; it will be
                    // overwritten by the fresh result below.
                    warn!(error = %e, "cached result failed to deserialize; recomputing");
                }
            }
        }

        let collection = self.engine.query(bbox).await?;

        match serde_json::to_vec(&collection) {
            Ok(bytes) => self.cache.set(bbox, bytes).await,
            Err(e) => warn!(error = %e, "result serialization failed; skipping cache store"),
        }

        Ok(collection)
    }
}
