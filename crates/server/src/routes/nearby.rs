//! Nearby search endpoint.
//!
//! Geocodes the `location` text (through the cache) and returns every
//! property within the radius, closest first.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use propsearch_core::NearbyProperty;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handler::AppState;

/// Query parameters for the nearby search.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyParams {
    /// Free-text location to search around.
    pub location: String,

    /// Search radius in kilometers; the configured default when absent.
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Response body for the nearby search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub properties: Vec<NearbyProperty>,
}

/// GET /properties/get/nearby?location=<text>[&radius_km=<float>]
pub async fn nearby(
    State(state): State<Arc<AppState>>, params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Query(params) = params?;
    let radius_km = params.radius_km.unwrap_or(state.default_radius_km);

    let properties = state.search.find_nearby(&params.location, radius_km).await?;
    tracing::info!(location = %params.location, radius_km, results = properties.len(), "nearby search");

    Ok(Json(NearbyResponse { properties }))
}
