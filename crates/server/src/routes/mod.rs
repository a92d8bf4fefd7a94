//! HTTP route handlers.
//!
//! This module contains every endpoint exposed by the propsearch server.

pub mod health;
pub mod nearby;
pub mod properties;

pub use nearby::{NearbyParams, NearbyResponse};
