//! Core types and shared functionality for propsearch.
//!
//! This crate provides:
//! - Property model and SQLite-backed spatial store
//! - Geocode cache with SQL-enforced expiry
//! - The nearby search that ties geocoding to radius queries
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod nearby;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use geo::Coordinates;
pub use geocode::{GeocodeCache, Geocoder, normalize_query};
pub use nearby::{DEFAULT_RADIUS_KM, NearbyProperty, NearbySearch};
pub use store::{Database, Property, PropertyInput, SqliteGeocodeCache};
