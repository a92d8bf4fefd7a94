//! Point-radius queries over stored properties.
//!
//! Candidates come from the `(latitude, longitude)` index through a spherical
//! bounding box; the exact great-circle distance then decides membership and
//! ordering.

use super::connection::Database;
use super::properties::{PROPERTY_COLUMNS, Property};
use crate::Error;
use crate::geo::{BoundingBox, Coordinates, DISTANCE_TOLERANCE_METERS};
use tokio_rusqlite::rusqlite::types::Value;

/// A property paired with its unrounded distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDistance {
    pub property: Property,
    pub distance_meters: f64,
}

/// Build the candidate query and its bound parameters for a bounding box.
fn candidate_query(bbox: &BoundingBox) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE latitude BETWEEN ?1 AND ?2");
    let mut values = vec![Value::Real(bbox.min_lat), Value::Real(bbox.max_lat)];

    let full_range = bbox.lon_ranges.iter().any(|r| r.min <= -180.0 && r.max >= 180.0);
    if !full_range {
        let clauses: Vec<String> = bbox
            .lon_ranges
            .iter()
            .map(|range| {
                values.push(Value::Real(range.min));
                values.push(Value::Real(range.max));
                format!("longitude BETWEEN ?{} AND ?{}", values.len() - 1, values.len())
            })
            .collect();
        sql.push_str(&format!(" AND ({})", clauses.join(" OR ")));
    }

    (sql, values)
}

impl Database {
    /// All properties within `radius_meters` of `center`, closest first.
    ///
    /// Distances are great-circle distances on a sphere. Equal distances are
    /// ordered by id.
    pub async fn find_within_radius(
        &self, center: Coordinates, radius_meters: f64,
    ) -> Result<Vec<PropertyDistance>, Error> {
        center.validate()?;
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(Error::InvalidInput(format!("radius must be a non-negative number, got {radius_meters}")));
        }

        let bbox = BoundingBox::around(center, radius_meters);
        let (sql, values) = candidate_query(&bbox);
        let limit = radius_meters + DISTANCE_TOLERANCE_METERS;

        let (candidates, mut matches) = self
            .conn
            .call(move |conn| -> Result<(usize, Vec<PropertyDistance>), Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(tokio_rusqlite::rusqlite::params_from_iter(values), Property::from_row)?;

                let mut candidates = 0;
                let mut matches = Vec::new();
                for row in rows {
                    let property = row?;
                    candidates += 1;
                    let distance_meters = center.distance_to(&property.coordinates());
                    if distance_meters <= limit {
                        matches.push(PropertyDistance { property, distance_meters });
                    }
                }
                Ok((candidates, matches))
            })
            .await
            .map_err(Error::from)?;

        matches.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.property.id.cmp(&b.property.id))
        });

        tracing::debug!(candidates, matched = matches.len(), radius_meters, "radius query");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::offset_north;
    use crate::store::PropertyInput;

    const ORIGIN: Coordinates = Coordinates { latitude: 40.7128, longitude: -74.0060 };

    async fn insert_at(db: &Database, name: &str, at: Coordinates) -> Property {
        db.create_property(&PropertyInput {
            name: name.to_string(),
            address: String::new(),
            latitude: at.latitude,
            longitude: at.longitude,
        })
        .await
        .unwrap()
    }

    fn names(results: &[PropertyDistance]) -> Vec<&str> {
        results.iter().map(|r| r.property.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_ordering_and_radius_filter() {
        let db = Database::open_in_memory().await.unwrap();
        for km in [5.0, 1.0, 50.0, 200.0] {
            insert_at(&db, &format!("{km}km"), offset_north(ORIGIN, km)).await;
        }

        let results = db.find_within_radius(ORIGIN, 100_000.0).await.unwrap();
        assert_eq!(names(&results), vec!["1km", "5km", "50km"]);
        assert!((results[0].distance_meters - 1_000.0).abs() < 1e-3);
        assert!((results[2].distance_meters - 50_000.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_boundary_distance_is_included() {
        let db = Database::open_in_memory().await.unwrap();
        let edge = offset_north(ORIGIN, 25.0);
        insert_at(&db, "edge", edge).await;

        let exact = ORIGIN.distance_to(&edge);
        let results = db.find_within_radius(ORIGIN, exact).await.unwrap();
        assert_eq!(names(&results), vec!["edge"]);

        let results = db.find_within_radius(ORIGIN, exact - 1.0).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_radius_matches_colocated_only() {
        let db = Database::open_in_memory().await.unwrap();
        insert_at(&db, "here", ORIGIN).await;
        insert_at(&db, "near", offset_north(ORIGIN, 0.05)).await;

        let results = db.find_within_radius(ORIGIN, 0.0).await.unwrap();
        assert_eq!(names(&results), vec!["here"]);
        assert_eq!(results[0].distance_meters, 0.0);
    }

    #[tokio::test]
    async fn test_no_matches_is_empty() {
        let db = Database::open_in_memory().await.unwrap();
        insert_at(&db, "far", offset_north(ORIGIN, 500.0)).await;

        let results = db.find_within_radius(ORIGIN, 10_000.0).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_equal_distances_order_by_id() {
        let db = Database::open_in_memory().await.unwrap();
        let north = offset_north(ORIGIN, 3.0);
        let first = insert_at(&db, "first", north).await;
        let second = insert_at(&db, "second", north).await;

        let results = db.find_within_radius(ORIGIN, 10_000.0).await.unwrap();
        assert_eq!(results[0].property.id, first.id);
        assert_eq!(results[1].property.id, second.id);
    }

    #[tokio::test]
    async fn test_query_across_antimeridian() {
        let db = Database::open_in_memory().await.unwrap();
        let center = Coordinates { latitude: 0.0, longitude: 179.95 };
        insert_at(&db, "east", Coordinates { latitude: 0.0, longitude: -179.95 }).await;
        insert_at(&db, "west", Coordinates { latitude: 0.0, longitude: 179.9 }).await;
        insert_at(&db, "elsewhere", Coordinates { latitude: 0.0, longitude: 0.0 }).await;

        let results = db.find_within_radius(center, 20_000.0).await.unwrap();
        assert_eq!(names(&results), vec!["west", "east"]);
    }

    #[tokio::test]
    async fn test_query_near_pole() {
        let db = Database::open_in_memory().await.unwrap();
        let center = Coordinates { latitude: 89.95, longitude: 0.0 };
        insert_at(&db, "across", Coordinates { latitude: 89.95, longitude: 180.0 }).await;

        let results = db.find_within_radius(center, 20_000.0).await.unwrap();
        assert_eq!(names(&results), vec!["across"]);
    }

    #[tokio::test]
    async fn test_rejects_invalid_radius() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(matches!(db.find_within_radius(ORIGIN, -1.0).await, Err(Error::InvalidInput(_))));
        assert!(matches!(db.find_within_radius(ORIGIN, f64::NAN).await, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_candidate_query_antimeridian_uses_two_ranges() {
        let bbox = BoundingBox::around(Coordinates { latitude: 0.0, longitude: 179.95 }, 20_000.0);
        let (sql, values) = candidate_query(&bbox);
        assert!(sql.contains("longitude BETWEEN ?3 AND ?4 OR longitude BETWEEN ?5 AND ?6"));
        assert_eq!(values.len(), 6);
    }

    #[test]
    fn test_candidate_query_full_longitude_skips_filter() {
        let bbox = BoundingBox::around(Coordinates { latitude: 89.95, longitude: 0.0 }, 20_000.0);
        let (sql, values) = candidate_query(&bbox);
        assert!(!sql.contains("longitude BETWEEN"));
        assert_eq!(values.len(), 2);
    }
}
