//! Geocode cache operations.
//!
//! Resolved coordinates are keyed by the normalized query text. Expiry is
//! enforced in SQL: a lookup never returns a row whose `expires_at` has passed.

use super::connection::Database;
use crate::Error;
use crate::geo::Coordinates;
use crate::geocode::GeocodeCache;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Default lifetime of a cached geocode result.
pub const DEFAULT_GEOCODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed-width timestamps so string comparison matches time order.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Database {
    /// Get unexpired cached coordinates for a normalized query.
    pub async fn get_geocode(&self, cache_key: &str) -> Result<Option<Coordinates>, Error> {
        let cache_key = cache_key.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<Coordinates>, Error> {
                let result = conn.query_row(
                    "SELECT latitude, longitude FROM geocode_cache
                    WHERE cache_key = ?1 AND expires_at > ?2",
                    params![cache_key, now],
                    |row| Ok(Coordinates { latitude: row.get(0)?, longitude: row.get(1)? }),
                );

                match result {
                    Ok(coords) => Ok(Some(coords)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite cached coordinates, expiring `ttl` from now.
    pub async fn put_geocode(&self, cache_key: &str, coords: Coordinates, ttl: Duration) -> Result<(), Error> {
        let cache_key = cache_key.to_string();
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| Error::InvalidInput(format!("invalid ttl: {e}")))?;
        let fetched = Utc::now();
        let fetched_at = timestamp(fetched);
        let expires_at = fetched
            .checked_add_signed(ttl)
            .map(timestamp)
            .ok_or_else(|| Error::InvalidInput(format!("ttl of {}s overflows the cache expiry", ttl.num_seconds())))?;

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO geocode_cache (cache_key, latitude, longitude, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(cache_key) DO UPDATE SET
                        latitude = excluded.latitude,
                        longitude = excluded.longitude,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![cache_key, coords.latitude, coords.longitude, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired geocode cache entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_geocodes(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM geocode_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of rows in the geocode cache, expired ones included.
    pub async fn geocode_cache_len(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM geocode_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

/// [`GeocodeCache`] backed by the `geocode_cache` table.
#[derive(Debug, Clone)]
pub struct SqliteGeocodeCache {
    db: Database,
    ttl: Duration,
}

impl SqliteGeocodeCache {
    pub fn new(db: Database, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl GeocodeCache for SqliteGeocodeCache {
    async fn lookup(&self, cache_key: &str) -> Result<Option<Coordinates>, Error> {
        self.db.get_geocode(cache_key).await
    }

    async fn store(&self, cache_key: &str, coords: Coordinates) -> Result<(), Error> {
        self.db.put_geocode(cache_key, coords, self.ttl).await
    }
}
