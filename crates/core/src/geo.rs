//! Spherical geometry helpers for point-radius queries.
//!
//! Distances use a spherical earth with the mean radius PostGIS applies in
//! `ST_DistanceSphere`, so results line up with a PostGIS-backed deployment.
//! Radius queries first narrow candidates with [`BoundingBox`] (served by the
//! latitude/longitude index) and then apply the exact [`haversine_distance`].

use serde::{Deserialize, Serialize};

use crate::Error;

/// Sphere radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_370_986.0;

/// Spatial reference identifier for WGS 84 longitude/latitude.
pub const SRID_WGS84: u32 = 4326;

/// Slack added to radius comparisons to absorb floating-point noise.
pub const DISTANCE_TOLERANCE_METERS: f64 = 1e-3;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates after checking both values are finite and in range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        let coords = Self { latitude, longitude };
        coords.validate()?;
        Ok(coords)
    }

    /// Check both values are finite degrees within their valid ranges.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::InvalidInput("latitude and longitude must be finite numbers".into()));
        }
        if self.latitude < -90.0 || self.latitude > 90.0 {
            return Err(Error::InvalidInput(format!("latitude {} is outside -90..90", self.latitude)));
        }
        if self.longitude < -180.0 || self.longitude > 180.0 {
            return Err(Error::InvalidInput(format!("longitude {} is outside -180..180", self.longitude)));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// A point geometry tagged with its spatial reference system.
///
/// Axis order follows WKT: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub srid: u32,
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    /// WGS 84 point for the given coordinates.
    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self { srid: SRID_WGS84, x: coords.longitude, y: coords.latitude }
    }

    /// Extended WKT, e.g. `SRID=4326;POINT(2.3522 48.8566)`.
    pub fn to_ewkt(&self) -> String {
        format!("SRID={};POINT({} {})", self.srid, self.x, self.y)
    }
}

/// Great-circle distance in meters between two lat/lon points (degrees).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Round a value to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Inclusive longitude interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonRange {
    pub min: f64,
    pub max: f64,
}

/// Candidate window for a radius query.
///
/// Every point within the radius lies inside the box; the box may also hold
/// points outside the radius, which the exact distance check removes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// One range normally, two when the window crosses the antimeridian.
    pub lon_ranges: Vec<LonRange>,
}

/// Relative margin applied to the box so boundary points survive rounding.
const BOX_MARGIN: f64 = 1e-9;

impl BoundingBox {
    /// Smallest lat/lon window that contains the circle around `center`.
    pub fn around(center: Coordinates, radius_meters: f64) -> Self {
        let full_lon = vec![LonRange { min: -180.0, max: 180.0 }];
        let angular = (radius_meters + DISTANCE_TOLERANCE_METERS) / EARTH_RADIUS_METERS;

        if angular >= std::f64::consts::PI {
            return Self { min_lat: -90.0, max_lat: 90.0, lon_ranges: full_lon };
        }

        let delta_lat = angular.to_degrees() + BOX_MARGIN;
        let min_lat = center.latitude - delta_lat;
        let max_lat = center.latitude + delta_lat;

        // The circle reaches a pole: every longitude is a candidate.
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self { min_lat: min_lat.max(-90.0), max_lat: max_lat.min(90.0), lon_ranges: full_lon };
        }

        let ratio = angular.sin() / center.latitude.to_radians().cos();
        if ratio >= 1.0 {
            return Self { min_lat, max_lat, lon_ranges: full_lon };
        }

        let delta_lon = ratio.asin().to_degrees() + BOX_MARGIN;
        let min_lon = center.longitude - delta_lon;
        let max_lon = center.longitude + delta_lon;

        let lon_ranges = if min_lon < -180.0 {
            vec![LonRange { min: min_lon + 360.0, max: 180.0 }, LonRange { min: -180.0, max: max_lon }]
        } else if max_lon > 180.0 {
            vec![LonRange { min: min_lon, max: 180.0 }, LonRange { min: -180.0, max: max_lon - 360.0 }]
        } else {
            vec![LonRange { min: min_lon, max: max_lon }]
        };

        Self { min_lat, max_lat, lon_ranges }
    }

    /// Whether the point falls inside the window.
    pub fn contains(&self, coords: &Coordinates) -> bool {
        coords.latitude >= self.min_lat
            && coords.latitude <= self.max_lat
            && self
                .lon_ranges
                .iter()
                .any(|r| coords.longitude >= r.min && coords.longitude <= r.max)
    }
}

/// Point `km` kilometers due north (negative: south) of `origin`.
///
/// Meridian arcs make this exact on the sphere, which keeps distance-based
/// fixtures free of approximation.
pub fn offset_north(origin: Coordinates, km: f64) -> Coordinates {
    let delta = (km * 1000.0 / EARTH_RADIUS_METERS).to_degrees();
    Coordinates { latitude: origin.latitude + delta, longitude: origin.longitude }
}
