//! Shared state and router for the propsearch server.
//!
//! Store, cache and geocoder handles are built by `main` and handed in here;
//! handlers only ever see them through [`AppState`].

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use propsearch_core::{Database, NearbySearch};
use tower_http::trace::TraceLayer;

use crate::routes::{health, nearby, properties};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub search: NearbySearch,
    pub default_radius_km: f64,
}

impl AppState {
    pub fn new(db: Database, search: NearbySearch, default_radius_km: f64) -> Self {
        Self { db, search, default_radius_km }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/properties", get(properties::list).post(properties::create))
        .route("/properties/get/nearby", get(nearby::nearby))
        .route(
            "/properties/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
