//! Spatial store adapter: the narrow interface between the query core and
//! whatever geometry-aware backend holds the points.
//!
//! The core needs exactly two operations: containment queries over an
//! axis-aligned rectangle, and batched insertion. Everything else about the
//! backend (indexing strategy, durability, connection handling) stays behind
//! the [`SpatialStore`] trait.
//!
//! # Dyn Compatibility
//!
//! The trait uses `Pin<Box<dyn Future>>` for its async methods so callers
//! can hold an `Arc<dyn SpatialStore>` and swap providers without generics
//! spreading through the query engine.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::policy::SpeedFilter;
use crate::record::PointRecord;
use crate::viewport::Envelope;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Infrastructure faults from the spatial store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or failed to execute the operation.
    #[error("spatial store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the caller-supplied timeout.
    #[error("spatial store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// A stored point together with the store's native geometry representation.
///
/// `position` is `[lng, lat]`, the order geometry was constructed in at
/// insertion time. The query engine passes it through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint {
    pub record: PointRecord,
    pub position: [f64; 2],
}

/// Geometry-aware point storage.
///
/// Implementations must be `Send + Sync`; the serving path issues
/// containment queries concurrently across requests and relies on the
/// backend for the concurrency safety of individual reads and writes.
pub trait SpatialStore: Send + Sync {
    /// Return all stored points whose geometry lies within the envelope,
    /// further restricted by `filter`.
    ///
    /// Row order is backend-defined; callers must not assume one.
    fn contained_within(
        &self,
        envelope: Envelope,
        filter: SpeedFilter,
    ) -> BoxFuture<'_, Result<Vec<StoredPoint>, StoreError>>;

    /// Persist a batch of records, constructing geometry from `(lng, lat)`.
    ///
    /// Returns the number of records inserted.
    fn insert_batch(&self, records: Vec<PointRecord>) -> BoxFuture<'_, Result<usize, StoreError>>;
}
