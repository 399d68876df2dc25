//! In-memory spatial store backed by an R-tree.
//!
//! Points are indexed by their `(lng, lat)` position in an `rstar::RTree`,
//! guarded by a `parking_lot::RwLock`. Containment queries take the read
//! lock; batch insertion takes the write lock. The serving design loads data
//! before serving starts, so write contention is not a concern on the read
//! path.

use parking_lot::RwLock;
use rstar::{RTree, RTreeObject, AABB};

use crate::policy::SpeedFilter;
use crate::record::PointRecord;
use crate::viewport::Envelope;

use super::{BoxFuture, SpatialStore, StoreError, StoredPoint};

/// R-tree entry: a record pinned at its geometry position.
#[derive(Debug, Clone)]
struct IndexedPoint {
    position: [f64; 2],
    record: PointRecord,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// In-memory `SpatialStore` provider.
#[derive(Default)]
pub struct MemoryStore {
    tree: RwLock<RTree<IndexedPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points currently indexed.
    pub fn len(&self) -> usize {
        self.tree.read().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpatialStore for MemoryStore {
    fn contained_within(
        &self,
        envelope: Envelope,
        filter: SpeedFilter,
    ) -> BoxFuture<'_, Result<Vec<StoredPoint>, StoreError>> {
        Box::pin(async move {
            let aabb = AABB::from_corners(envelope.lower(), envelope.upper());
            let tree = self.tree.read();
            let points = tree
                .locate_in_envelope(&aabb)
                .filter(|p| filter.accepts(p.record.speed))
                .map(|p| StoredPoint {
                    record: p.record.clone(),
                    position: p.position,
                })
                .collect();
            Ok(points)
        })
    }

    fn insert_batch(&self, records: Vec<PointRecord>) -> BoxFuture<'_, Result<usize, StoreError>> {
        Box::pin(async move {
            let mut tree = self.tree.write();
            let count = records.len();
            for record in records {
                let position = record.position();
                tree.insert(IndexedPoint { position, record });
            }
            Ok(count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::BoundingBox;

    fn record_at(lat: f64, lng: f64, speed: f64) -> PointRecord {
        PointRecord {
            frame_number: 1,
            frame_time: "2024-03-01T12:00:00Z".to_string(),
            group_id: 1,
            group_order: 1,
            lat,
            lng,
            millis: 0,
            speed,
            video_index: 0,
        }
    }

    fn envelope(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Envelope {
        BoundingBox::new(min_lat, min_lng, max_lat, max_lng, 16).envelope()
    }

    #[tokio::test]
    async fn test_insert_batch_reports_count() {
        let store = MemoryStore::new();
        let inserted = store
            .insert_batch(vec![
                record_at(10.0005, 20.0005, 50.0),
                record_at(10.0006, 20.0006, 10.0),
            ])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_containment_finds_point_at_own_coordinates() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![record_at(10.0005, 20.0005, 50.0)])
            .await
            .unwrap();

        let found = store
            .contained_within(envelope(10.0, 20.0, 10.001, 20.001), SpeedFilter::All)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, [20.0005, 10.0005]);
        assert_eq!(found[0].record.speed, 50.0);
    }

    #[tokio::test]
    async fn test_containment_excludes_points_outside() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record_at(10.0005, 20.0005, 50.0),
                record_at(11.0, 21.0, 50.0),
            ])
            .await
            .unwrap();

        let found = store
            .contained_within(envelope(10.0, 20.0, 10.001, 20.001), SpeedFilter::All)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.lat, 10.0005);
    }

    #[tokio::test]
    async fn test_min_speed_filter_applied() {
        let store = MemoryStore::new();
        store
            .insert_batch(vec![
                record_at(10.0004, 20.0004, 10.0),
                record_at(10.0005, 20.0005, 30.0),
                record_at(10.0006, 20.0006, 50.0),
            ])
            .await
            .unwrap();

        let found = store
            .contained_within(
                envelope(10.0, 20.0, 10.001, 20.001),
                SpeedFilter::MinSpeed(30.0),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.record.speed >= 30.0));
    }

    #[tokio::test]
    async fn test_geometry_is_lng_first_round_trip() {
        // Insert by record, query by an envelope that only matches when the
        // store indexed (lng, lat) in that order.
        let store = MemoryStore::new();
        store
            .insert_batch(vec![record_at(10.0, 60.0, 40.0)])
            .await
            .unwrap();

        // Correct envelope around (lng=60, lat=10).
        let found = store
            .contained_within(envelope(9.9, 59.9, 10.1, 60.1), SpeedFilter::All)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        // Transposed envelope around (lng=10, lat=60) must find nothing.
        let found = store
            .contained_within(envelope(59.9, 9.9, 60.1, 10.1), SpeedFilter::All)
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
