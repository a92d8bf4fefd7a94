//! Provider response types and first-match selection.
//!
//! The provider returns a JSON array of candidates, best guess first. Only the
//! first candidate is read; the rest of the array is never inspected, so a bad
//! trailing entry cannot fail a lookup.

use propsearch_core::Coordinates;
use serde::Deserialize;

use crate::geocode::GeocodeError;

/// A coordinate value, sent as a string by some providers and as a number by others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn parse(&self, field: &str) -> Result<f64, GeocodeError> {
        match self {
            CoordinateValue::Number(n) => Ok(*n),
            CoordinateValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::Malformed(format!("{field} is not a number: {s:?}"))),
        }
    }
}

/// One geocoding candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub lat: CoordinateValue,
    pub lon: CoordinateValue,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Candidate {
    /// Parsed and range-checked coordinates.
    pub fn coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let latitude = self.lat.parse("lat")?;
        let longitude = self.lon.parse("lon")?;
        Coordinates::new(latitude, longitude).map_err(|e| GeocodeError::Malformed(e.to_string()))
    }
}

/// Pick the first candidate out of a raw response body.
pub fn first_candidate(query: &str, body: &[u8]) -> Result<Candidate, GeocodeError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| GeocodeError::Malformed(format!("invalid JSON: {e}")))?;

    let serde_json::Value::Array(mut results) = value else {
        return Err(GeocodeError::Malformed("expected a JSON array of results".into()));
    };

    if results.is_empty() {
        return Err(GeocodeError::NotFound(query.to_string()));
    }

    serde_json::from_value(results.swap_remove(0)).map_err(|e| GeocodeError::Malformed(e.to_string()))
}
