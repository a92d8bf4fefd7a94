//! Nearby search: free text in, distance-ranked properties out.
//!
//! Resolution goes through the geocode cache first and the provider only on a
//! miss. Cache failures are logged and treated as misses; provider failures
//! fail the search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::geo::{Coordinates, round2};
use crate::geocode::{GeocodeCache, Geocoder, normalize_query};
use crate::store::{Database, Property};

/// Radius used when the caller does not pass one.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// A property with its distance from the searched location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyProperty {
    #[serde(flatten)]
    pub property: Property,
    /// Kilometers, rounded to two decimals.
    pub distance_km: f64,
}

/// Composes geocoding, caching and the spatial store.
#[derive(Clone)]
pub struct NearbySearch {
    db: Database,
    cache: Arc<dyn GeocodeCache>,
    geocoder: Arc<dyn Geocoder>,
}

impl NearbySearch {
    pub fn new(db: Database, cache: Arc<dyn GeocodeCache>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { db, cache, geocoder }
    }

    /// Find properties within `radius_km` of the place named by `location`.
    ///
    /// Results are ordered closest first using unrounded distances; ties keep
    /// id order.
    pub async fn find_nearby(&self, location: &str, radius_km: f64) -> Result<Vec<NearbyProperty>, Error> {
        if location.trim().is_empty() {
            return Err(Error::InvalidInput("location cannot be empty".into()));
        }
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(Error::InvalidInput(format!("radius_km must be a non-negative number, got {radius_km}")));
        }

        let center = self.resolve(location).await?;
        let matches = self.db.find_within_radius(center, radius_km * 1000.0).await?;

        Ok(matches
            .into_iter()
            .map(|m| NearbyProperty { property: m.property, distance_km: round2(m.distance_meters / 1000.0) })
            .collect())
    }

    /// Cache-or-fetch geocoding for a location query.
    pub async fn resolve(&self, location: &str) -> Result<Coordinates, Error> {
        let cache_key = normalize_query(location);

        match self.cache.lookup(&cache_key).await {
            Ok(Some(coords)) => {
                tracing::debug!(key = %cache_key, "geocode cache hit");
                return Ok(coords);
            }
            Ok(None) => tracing::debug!(key = %cache_key, "geocode cache miss"),
            Err(e) => tracing::warn!(key = %cache_key, error = %e, "geocode cache lookup failed, treating as miss"),
        }

        let coords = self.geocoder.resolve(location).await?;

        if let Err(e) = self.cache.store(&cache_key, coords).await {
            tracing::warn!(key = %cache_key, error = %e, "failed to cache geocode result");
        }

        Ok(coords)
    }
}
