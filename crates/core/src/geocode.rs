//! Seams between the nearby search and its geocoding collaborators.
//!
//! The HTTP provider and the cache are injected as trait objects so the
//! search can run against fakes in tests.

use async_trait::async_trait;

use crate::Error;
use crate::geo::Coordinates;

/// Resolves free text into coordinates.
///
/// Implementations report an empty or unusable answer as
/// [`Error::LocationNotFound`], a slow provider as [`Error::UpstreamTimeout`]
/// and any other transport or status failure as [`Error::UpstreamError`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Coordinates, Error>;
}

/// Key-value store of resolved coordinates with time-based expiry.
///
/// Expiry is the store's job: `lookup` never returns an expired entry.
#[async_trait]
pub trait GeocodeCache: Send + Sync {
    async fn lookup(&self, cache_key: &str) -> Result<Option<Coordinates>, Error>;

    /// Write or overwrite an entry.
    async fn store(&self, cache_key: &str, coords: Coordinates) -> Result<(), Error>;
}

/// Cache key for a location query: the query lower-cased, nothing else.
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}
