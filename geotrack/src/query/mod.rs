//! Query engine: one authoritative spatial read.
//!
//! The engine validates the viewport, asks the zoom policy for the filter
//! and labeling rule, issues a single containment query against the spatial
//! store, and shapes the rows into a [`FeatureCollection`]. It does not
//! retry and does not sort; row order is whatever the store returned.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::policy::ZoomPolicy;
use crate::record::{Feature, FeatureCollection, Geometry, PointProperties};
use crate::store::{SpatialStore, StoreError};
use crate::viewport::{BoundingBox, BoundingBoxError};

/// Default bound on a single store operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures surfaced by the query path.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Client-caused: the box violates an ordering invariant. Detected
    /// before any I/O; the store is never contacted.
    #[error(transparent)]
    InvalidBoundingBox(#[from] BoundingBoxError),

    /// Infrastructure fault from the spatial store, cause attached. Not
    /// retried here; retry policy belongs to the caller.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Orchestrates validation, policy application, and result shaping for a
/// single bounding-box read.
pub struct QueryEngine {
    store: Arc<dyn SpatialStore>,
    policy: ZoomPolicy,
    op_timeout: Duration,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn SpatialStore>, policy: ZoomPolicy, op_timeout: Duration) -> Self {
        Self {
            store,
            policy,
            op_timeout,
        }
    }

    /// Execute one containment query and shape the result.
    pub async fn query(&self, bbox: &BoundingBox) -> Result<FeatureCollection, QueryError> {
        // Cheap and synchronous; must never reach the store.
        bbox.validate()?;

        let filter = self.policy.filter(bbox.zoom_level);
        let envelope = bbox.envelope();

        let points = tokio::time::timeout(
            self.op_timeout,
            self.store.contained_within(envelope, filter),
        )
        .await
        .map_err(|_| StoreError::Timeout(self.op_timeout))??;

        debug!(
            zoom = bbox.zoom_level,
            rows = points.len(),
            ?filter,
            "containment query returned"
        );

        let features = points
            .into_iter()
            .map(|point| {
                let label = self
                    .policy
                    .classify(bbox.zoom_level, point.record.speed)
                    .to_string();
                Feature::new(
                    // Geometry passes through verbatim from the store.
                    Geometry::Point {
                        coordinates: point.position,
                    },
                    PointProperties::from_record(point.record, label),
                )
            })
            .collect();

        Ok(FeatureCollection::new(features))
    }
}
