//! Geotrack - GPS trajectory telemetry for map clients
//!
//! This library serves vehicle trajectory points (position, speed, and
//! frame-linkage metadata) through bounding-box queries, and loads bulk
//! telemetry exports into a spatially indexed store.
//!
//! # Architecture
//!
//! ```text
//! caller ──► TrackService ──► QueryCacheClient ──► ResultCache (moka, TTL)
//!                │  (miss)
//!                ▼
//!            QueryEngine ──► ZoomPolicy
//!                │
//!                ▼
//!            SpatialStore (R-tree) ◄── IngestPipeline ◄── bulk export
//! ```
//!
//! The zoom policy is the single source of truth for speed filtering and
//! point classification. The cache layer memoizes shaped results per
//! viewport fingerprint with bounded staleness and fails open when the
//! cache backend misbehaves.

pub mod cache;
pub mod config;
pub mod ingest;
pub mod policy;
pub mod query;
pub mod record;
pub mod service;
pub mod store;
pub mod viewport;

pub use config::ServiceConfig;
pub use ingest::{IngestPipeline, IngestReport};
pub use policy::ZoomPolicy;
pub use query::{QueryEngine, QueryError};
pub use record::{FeatureCollection, PointRecord, RawPointRecord};
pub use service::TrackService;
pub use store::{MemoryStore, SpatialStore};
pub use viewport::BoundingBox;
