//! Rating submission endpoint.

use super::parse_id;
use crate::auth::{credentials, middleware::caller_id, models::Claims};
use crate::auth::credentials::ValidationError;
use crate::error::ApiError;
use crate::models::Rating;
use crate::state::AppState;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub store_id: Option<String>,
    pub value: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub message: &'static str,
    pub rating: Rating,
}

/// Create or replace the caller's rating - POST /ratings
pub async fn submit_rating(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RatingRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
    let store_raw = credentials::require(payload.store_id.as_deref(), "storeId")?;
    let store_id = parse_id(store_raw)?;
    let value = payload
        .value
        .ok_or(ApiError::Validation(ValidationError::FieldMissing("value")))?;

    let rating = state
        .ratings
        .submit(caller_id(&claims)?, store_id, value)?;

    Ok(Json(RatingResponse {
        message: "Rating submitted",
        rating,
    }))
}
