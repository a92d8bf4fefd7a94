//! Property CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use propsearch_core::{Property, PropertyInput};

use crate::error::ApiError;
use crate::handler::AppState;

/// POST /properties
pub async fn create(
    State(state): State<Arc<AppState>>, payload: Result<Json<PropertyInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let Json(input) = payload?;
    let property = state.db.create_property(&input).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /properties
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Property>>, ApiError> {
    Ok(Json(state.db.list_properties().await?))
}

/// GET /properties/:id
pub async fn get(
    State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Property>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.db.get_property(id).await?))
}

/// PUT /properties/:id
///
/// Replaces every field; the stored point follows the new coordinates.
pub async fn update(
    State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PropertyInput>, JsonRejection>,
) -> Result<Json<Property>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.db.update_property(id, &input).await?))
}

/// DELETE /properties/:id
pub async fn delete(
    State(state): State<Arc<AppState>>, id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.delete_property(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
