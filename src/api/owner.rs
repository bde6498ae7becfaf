//! Owner-scoped endpoints: my stores and their raters.

use super::parse_id;
use crate::auth::middleware::{caller_id, require_owner_role};
use crate::auth::models::Claims;
use crate::error::ApiError;
use crate::models::{RaterEntry, StoreWithStats};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct OwnerStoresResponse {
    pub stores: Vec<StoreWithStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRatingsResponse {
    pub store_id: Uuid,
    pub total_ratings: usize,
    pub ratings: Vec<RaterEntry>,
}

/// The caller's stores with rating stats - GET /owner/stores
pub async fn my_stores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<OwnerStoresResponse>, ApiError> {
    require_owner_role(&claims)?;

    let stores = state.directory.owner_stores(caller_id(&claims)?)?;

    Ok(Json(OwnerStoresResponse { stores }))
}

/// Who rated my store, and how - GET /owner/store/:id/ratings
pub async fn store_ratings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<StoreRatingsResponse>, ApiError> {
    require_owner_role(&claims)?;

    let store_id = parse_id(&id)?;
    let store = state
        .db
        .get_store(store_id)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    if store.owner_id != caller_id(&claims)? {
        return Err(ApiError::Forbidden(
            "Not authorized to view ratings of this store",
        ));
    }

    let ratings = state.ratings.ratings_for_store(store_id)?;

    Ok(Json(StoreRatingsResponse {
        store_id,
        total_ratings: ratings.len(),
        ratings,
    }))
}
