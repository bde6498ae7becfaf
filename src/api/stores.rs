//! Store resource endpoints.

use super::parse_id;
use crate::auth::{credentials, middleware::caller_id, models::Claims};
use crate::error::ApiError;
use crate::models::{MessageResponse, Store, StoreDetails, StoreListFilter, StorePage};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StoreCreateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Update body: absent fields keep the stored values.
#[derive(Debug, Deserialize)]
pub struct StoreUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoreMutationResponse {
    pub message: &'static str,
    pub store: Store,
}

/// Public store directory - GET /stores
pub async fn list_stores(
    State(state): State<AppState>,
    Query(filter): Query<StoreListFilter>,
) -> Result<Json<StorePage>, ApiError> {
    Ok(Json(state.directory.list_stores(&filter)?))
}

/// Store details with the caller's own rating - GET /stores/:id
pub async fn get_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<StoreDetails>, ApiError> {
    let store_id = parse_id(&id)?;
    let details = state
        .directory
        .store_details(store_id, caller_id(&claims)?)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    Ok(Json(details))
}

/// Create a store; the caller becomes its owner - POST /stores
pub async fn create_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StoreCreateRequest>,
) -> Result<Json<StoreMutationResponse>, ApiError> {
    let name = credentials::require(payload.name.as_deref(), "name")?;
    let email = credentials::require(payload.email.as_deref(), "email")?;
    let address = credentials::require(payload.address.as_deref(), "address")?;

    credentials::validate_store_fields(name, email, address)?;

    let store = state
        .db
        .create_store(name, email, address, caller_id(&claims)?)?;

    Ok(Json(StoreMutationResponse {
        message: "Store created",
        store,
    }))
}

/// Owner-only partial update - PUT /stores/:id
pub async fn update_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<StoreUpdateRequest>,
) -> Result<Json<StoreMutationResponse>, ApiError> {
    let store_id = parse_id(&id)?;
    let store = state
        .db
        .get_store(store_id)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    if store.owner_id != caller_id(&claims)? {
        return Err(ApiError::Forbidden("Not authorized to update this store"));
    }

    // Provided fields must still satisfy the store invariants.
    if let Some(name) = payload.name.as_deref() {
        credentials::validate_name(name)?;
    }
    if let Some(email) = payload.email.as_deref() {
        credentials::validate_email(email)?;
    }
    if let Some(address) = payload.address.as_deref() {
        credentials::validate_address(address)?;
    }

    let store = state
        .db
        .update_store(
            store_id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.address.as_deref(),
        )?
        .ok_or(ApiError::NotFound("Store not found"))?;

    Ok(Json(StoreMutationResponse {
        message: "Store updated",
        store,
    }))
}

/// Owner-only deletion; ratings cascade away with the store - DELETE /stores/:id
pub async fn delete_store(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store_id = parse_id(&id)?;
    let store = state
        .db
        .get_store(store_id)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    if store.owner_id != caller_id(&claims)? {
        return Err(ApiError::Forbidden("Not authorized to delete this store"));
    }

    state.db.delete_store(store_id)?;

    Ok(Json(MessageResponse {
        message: "Store deleted",
    }))
}
