//! Zoom policy: the single source of truth for speed filtering and point
//! classification.
//!
//! The policy decides, per zoom level, (a) which points are eligible for
//! return and (b) which label each returned point receives. Both halves have
//! changed semantics historically (threshold and label vocabulary), so they
//! live in one versionable value instead of being scattered through query
//! code. The policy is a pure function of its inputs; it performs no I/O.
//!
//! # Behavior
//!
//! - At or above [`ZoomPolicy::detail_zoom`] every in-viewport point is
//!   eligible, labeled by comparing its speed to the threshold.
//! - Below `detail_zoom` only points with `speed >= threshold` are eligible
//!   (slow points are suppressed, not relabeled), and every eligible point
//!   receives the above-threshold label unconditionally. The filter has
//!   already decided the label, so recomputing it per point would be wasted
//!   work at the store boundary.

/// Default zoom level at which full point detail becomes visible.
pub const DEFAULT_DETAIL_ZOOM: u8 = 15;

/// Filter predicate handed to the spatial store alongside the containment
/// envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedFilter {
    /// Every point in the viewport is eligible.
    All,
    /// Only points with `speed >= min` are eligible.
    MinSpeed(f64),
}

impl SpeedFilter {
    /// Whether a point with the given speed passes the filter.
    pub fn accepts(&self, speed: f64) -> bool {
        match *self {
            SpeedFilter::All => true,
            SpeedFilter::MinSpeed(min) => speed >= min,
        }
    }
}

/// Filtering and classification policy, parameterized by zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPolicy {
    /// Speed threshold separating the two labels, in record speed units.
    pub speed_threshold: f64,
    /// Label for points with `speed < speed_threshold`.
    pub below_label: String,
    /// Label for points with `speed >= speed_threshold`.
    pub above_label: String,
    /// Zoom level at or above which all points are shown.
    pub detail_zoom: u8,
}

impl ZoomPolicy {
    pub fn new(
        speed_threshold: f64,
        below_label: impl Into<String>,
        above_label: impl Into<String>,
    ) -> Self {
        Self {
            speed_threshold,
            below_label: below_label.into(),
            above_label: above_label.into(),
            detail_zoom: DEFAULT_DETAIL_ZOOM,
        }
    }

    /// Historical policy version used for road-condition review: slow
    /// points are potential distress sites.
    pub fn distress() -> Self {
        Self::new(30.0, "distress", "normal")
    }

    /// Historical policy version used for speed monitoring.
    pub fn speeding() -> Self {
        Self::new(46.0, "Normal", "Speeding")
    }

    /// Override the detail zoom cutover.
    pub fn with_detail_zoom(mut self, detail_zoom: u8) -> Self {
        self.detail_zoom = detail_zoom;
        self
    }

    /// The eligibility filter for a given zoom level.
    pub fn filter(&self, zoom_level: u8) -> SpeedFilter {
        if zoom_level >= self.detail_zoom {
            SpeedFilter::All
        } else {
            SpeedFilter::MinSpeed(self.speed_threshold)
        }
    }

    /// The classification label for an eligible point at a given zoom level.
    pub fn classify(&self, zoom_level: u8, speed: f64) -> &str {
        if zoom_level >= self.detail_zoom {
            if speed < self.speed_threshold {
                &self.below_label
            } else {
                &self.above_label
            }
        } else {
            // Below detail zoom the filter already excluded slow points;
            // everything that remains carries the above-threshold label.
            &self.above_label
        }
    }
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self::distress()
    }
}
