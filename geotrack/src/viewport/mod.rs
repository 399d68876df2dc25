//! Viewport types for bounding-box queries.
//!
//! A [`BoundingBox`] is the client-facing request shape: the geographic
//! rectangle of the current map view plus the zoom level. It is validated
//! once, before any store or cache access, and then folded into either a
//! cache fingerprint or a containment [`Envelope`].
//!
//! # Coordinate Order
//!
//! Clients express the box latitude-first (`min_lat`, `min_lng`, ...), but
//! every spatial operation downstream works longitude-first, matching how
//! point geometry is constructed from `(lng, lat)`. [`Envelope`] is the
//! single place where that reordering happens; nothing else in the crate is
//! allowed to build corner pairs by hand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A map viewport: axis-aligned geographic rectangle plus zoom level.
///
/// Immutable once constructed; created per incoming request and discarded
/// after the request completes or after being folded into a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge, WGS84 degrees.
    pub min_lat: f64,
    /// Western edge, WGS84 degrees.
    pub min_lng: f64,
    /// Northern edge, WGS84 degrees.
    pub max_lat: f64,
    /// Eastern edge, WGS84 degrees.
    pub max_lng: f64,
    /// Map zoom level controlling the filter/classification policy.
    pub zoom_level: u8,
}

/// A degenerate or inverted bounding box.
///
/// Always a client error: it is detected synchronously, before any I/O,
/// and must never reach the spatial store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    /// `min_lat >= max_lat`.
    #[error("invalid bounding box: min_lat ({min_lat}) must be less than max_lat ({max_lat})")]
    LatitudeOrder { min_lat: f64, max_lat: f64 },

    /// `min_lng >= max_lng`.
    #[error("invalid bounding box: min_lng ({min_lng}) must be less than max_lng ({max_lng})")]
    LongitudeOrder { min_lng: f64, max_lng: f64 },
}

impl BoundingBox {
    /// Create a bounding box without validating it.
    ///
    /// Validation is deliberately separate so that a box deserialized from
    /// a request can carry its raw values into the error message.
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64, zoom_level: u8) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
            zoom_level,
        }
    }

    /// Check the ordering invariants: `min_lat < max_lat` and
    /// `min_lng < max_lng`.
    ///
    /// NaN bounds fail both comparisons and are rejected here as well.
    pub fn validate(&self) -> Result<(), BoundingBoxError> {
        if !(self.min_lat < self.max_lat) {
            return Err(BoundingBoxError::LatitudeOrder {
                min_lat: self.min_lat,
                max_lat: self.max_lat,
            });
        }
        if !(self.min_lng < self.max_lng) {
            return Err(BoundingBoxError::LongitudeOrder {
                min_lng: self.min_lng,
                max_lng: self.max_lng,
            });
        }
        Ok(())
    }

    /// Fold this box into a containment envelope (longitude-first order).
    pub fn envelope(&self) -> Envelope {
        Envelope {
            min_lng: self.min_lng,
            min_lat: self.min_lat,
            max_lng: self.max_lng,
            max_lat: self.max_lat,
        }
    }
}

/// Containment rectangle in the store's native `(lng, lat)` corner order.
///
/// Constructed only via [`BoundingBox::envelope`] so the longitude-first
/// convention cannot drift from the geometry construction convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Envelope {
    /// South-west corner as `[lng, lat]`.
    pub fn lower(&self) -> [f64; 2] {
        [self.min_lng, self.min_lat]
    }

    /// North-east corner as `[lng, lat]`.
    pub fn upper(&self) -> [f64; 2] {
        [self.max_lng, self.max_lat]
    }
}
