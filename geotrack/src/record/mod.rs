//! Telemetry data model: point records and the GeoJSON result shapes.
//!
//! A [`PointRecord`] is one sampled GPS fix from a vehicle-mounted camera
//! run: position, speed, and the frame/video linkage needed to jump from a
//! map marker back into the source footage. Records are immutable once
//! persisted; this crate never mutates or deletes them.
//!
//! Query results are shaped as a [`FeatureCollection`] so map clients can
//! render them directly. The geometry is always a structured `Point` object
//! with `[lng, lat]` coordinates, never a string.

use serde::{Deserialize, Serialize};

/// One sampled GPS fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Ordinal of the frame within its source video.
    pub frame_number: i64,
    /// Wall-clock timestamp of the frame.
    pub frame_time: String,
    /// Logical trip/segment grouping.
    pub group_id: i64,
    /// Ordering within the group.
    pub group_order: i64,
    /// Latitude, WGS84 degrees.
    pub lat: f64,
    /// Longitude, WGS84 degrees.
    pub lng: f64,
    /// Timestamp offset in milliseconds.
    pub millis: i64,
    /// Speed in the same units as the policy threshold.
    pub speed: f64,
    /// Source video reference.
    pub video_index: i64,
}

impl PointRecord {
    /// The record's geometry position in the canonical `[lng, lat]` order.
    ///
    /// Every geometry in the system is constructed through this accessor;
    /// transposing the pair silently corrupts all spatial queries.
    pub fn position(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// A point record as it appears in bulk export files.
///
/// The export format uses camelCase keys. Required-field presence is
/// enforced at parse time; a record missing any field fails deserialization
/// rather than producing a partially populated row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPointRecord {
    pub frame_number: i64,
    pub frame_time: String,
    pub group_id: i64,
    pub group_order: i64,
    pub lat: f64,
    pub lng: f64,
    pub millis: i64,
    pub speed: f64,
    pub video_index: i64,
}

impl From<RawPointRecord> for PointRecord {
    fn from(raw: RawPointRecord) -> Self {
        PointRecord {
            frame_number: raw.frame_number,
            frame_time: raw.frame_time,
            group_id: raw.group_id,
            group_order: raw.group_order,
            lat: raw.lat,
            lng: raw.lng,
            millis: raw.millis,
            speed: raw.speed,
            video_index: raw.video_index,
        }
    }
}

/// GeoJSON-style geometry. Only points are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A 2D point; coordinates are `[lng, lat]`.
    Point { coordinates: [f64; 2] },
}

/// Marker for the `"type": "Feature"` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// Marker for the `"type": "FeatureCollection"` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

/// All point record fields plus the policy-derived classification label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    pub frame_number: i64,
    pub frame_time: String,
    pub group_id: i64,
    pub group_order: i64,
    pub lat: f64,
    pub lng: f64,
    pub millis: i64,
    pub speed: f64,
    pub video_index: i64,
    /// Classification label assigned by the zoom policy.
    pub point_type: String,
}

impl PointProperties {
    /// Build properties from a record and its computed label.
    pub fn from_record(record: PointRecord, point_type: String) -> Self {
        Self {
            frame_number: record.frame_number,
            frame_time: record.frame_time,
            group_id: record.group_id,
            group_order: record.group_order,
            lat: record.lat,
            lng: record.lng,
            millis: record.millis,
            speed: record.speed,
            video_index: record.video_index,
            point_type,
        }
    }
}

/// One shaped result feature: geometry plus annotated properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: Geometry,
    pub properties: PointProperties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: PointProperties) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry,
            properties,
        }
    }
}

/// An ordered sequence of features; the query result document.
///
/// Constructed fresh per query (or reconstructed from cache) and never
/// mutated after construction. Feature order is whatever order the store
/// returned rows in; no sort is imposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_record() -> PointRecord {
        PointRecord {
            frame_number: 42,
            frame_time: "2024-03-01T12:00:00Z".to_string(),
            group_id: 3,
            group_order: 7,
            lat: 10.0005,
            lng: 20.0005,
            millis: 1_709_294_400_000,
            speed: 50.0,
            video_index: 1,
        }
    }

    #[test]
    fn test_position_is_lng_first() {
        let record = sample_record();
        assert_eq!(record.position(), [20.0005, 10.0005]);
    }

    #[test]
    fn test_raw_record_parses_camel_case() {
        let json = r#"{
            "frameNumber": 42,
            "frameTime": "2024-03-01T12:00:00Z",
            "groupId": 3,
            "groupOrder": 7,
            "lat": 10.0005,
            "lng": 20.0005,
            "millis": 1709294400000,
            "speed": 50.0,
            "videoIndex": 1
        }"#;
        let raw: RawPointRecord = serde_json::from_str(json).unwrap();
        let record: PointRecord = raw.into();
        assert_eq!(record, sample_record());
    }

    #[test]
    fn test_raw_record_missing_field_rejected() {
        // No speed field: the row must fail to parse, not default to zero.
        let json = r#"{
            "frameNumber": 42,
            "frameTime": "2024-03-01T12:00:00Z",
            "groupId": 3,
            "groupOrder": 7,
            "lat": 10.0005,
            "lng": 20.0005,
            "millis": 1709294400000,
            "videoIndex": 1
        }"#;
        assert!(serde_json::from_str::<RawPointRecord>(json).is_err());
    }

    #[test]
    fn test_geometry_serializes_as_geojson_point() {
        let geometry = Geometry::Point {
            coordinates: [20.0005, 10.0005],
        };
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], 20.0005);
        assert_eq!(json["coordinates"][1], 10.0005);
    }

    #[test]
    fn test_feature_collection_document_shape() {
        let record = sample_record();
        let feature = Feature::new(
            Geometry::Point {
                coordinates: record.position(),
            },
            PointProperties::from_record(record, "normal".to_string()),
        );
        let collection = FeatureCollection::new(vec![feature]);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert_eq!(json["features"][0]["properties"]["point_type"], "normal");
        assert_eq!(json["features"][0]["properties"]["frame_number"], 42);
    }

    #[test]
    fn test_feature_collection_round_trips_bytes() {
        let record = sample_record();
        let feature = Feature::new(
            Geometry::Point {
                coordinates: record.position(),
            },
            PointProperties::from_record(record, "normal".to_string()),
        );
        let collection = FeatureCollection::new(vec![feature]);

        let bytes = serde_json::to_vec(&collection).unwrap();
        let restored: FeatureCollection = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, collection);
        // Re-serializing the restored value must produce identical bytes,
        // which is what makes cached responses byte-stable.
        assert_eq!(serde_json::to_vec(&restored).unwrap(), bytes);
    }
}
