//! SQLite-backed spatial store for properties and geocode results.
//!
//! Persistence goes through tokio-rusqlite so every operation runs on the
//! connection's background thread. It provides:
//!
//! - Property CRUD with a derived EWKT point column
//! - Great-circle radius queries with an indexed bounding-box prefilter
//! - A geocode cache table with SQL-enforced expiry
//! - Versioned schema migrations

pub mod connection;
pub mod geocode_cache;
pub mod migrations;
pub mod properties;
pub mod spatial;

pub use crate::Error;

pub use connection::Database;
pub use geocode_cache::{DEFAULT_GEOCODE_TTL, SqliteGeocodeCache};
pub use properties::{Property, PropertyInput};
pub use spatial::PropertyDistance;
