//! Client code for propsearch.
//!
//! This crate provides the HTTP geocoding client used by the nearby search,
//! implementing [`propsearch_core::Geocoder`].

pub mod geocode;

pub use geocode::{GeocodeClient, GeocodeConfig, GeocodeError, GeocodeRequest};
