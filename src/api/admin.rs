//! Admin-scoped endpoints: stats, directories, user provisioning.

use crate::auth::{
    credentials,
    middleware::require_admin,
    models::{Claims, CreateUserRequest, Role, SignupResponse},
};
use crate::error::ApiError;
use crate::models::{PlatformStats, StoreAdminFilter, StoreWithStats, UserListFilter, UserSummary};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use tracing::info;

/// Platform counters - GET /admin/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PlatformStats>, ApiError> {
    require_admin(&claims)?;

    Ok(Json(state.directory.stats()?))
}

/// Filtered user directory - GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<UserListFilter>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    require_admin(&claims)?;

    Ok(Json(state.directory.list_users(&filter)?))
}

/// Filtered store directory with aggregates - GET /admin/stores
pub async fn list_stores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<StoreAdminFilter>,
) -> Result<Json<Vec<StoreWithStats>>, ApiError> {
    require_admin(&claims)?;

    Ok(Json(state.directory.list_stores_admin(&filter)?))
}

/// Provision a user with any role - POST /admin/users
///
/// This is how OWNER and additional ADMIN accounts come to exist; public
/// signup always creates USER.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    require_admin(&claims)?;

    let name = credentials::require(payload.name.as_deref(), "name")?;
    let email = credentials::require(payload.email.as_deref(), "email")?;
    let password = credentials::require(payload.password.as_deref(), "password")?;
    let address = credentials::require(payload.address.as_deref(), "address")?;

    credentials::validate_signup(name, email, password, address)?;

    let role = payload.role.unwrap_or(Role::User);
    let password_hash = credentials::hash_password(password)?;
    let user = state
        .db
        .create_user(name, email, &password_hash, address, role)?
        .ok_or(ApiError::Conflict("Email already registered"))?;

    info!("✅ User created by admin: {} ({})", user.email, user.role.as_str());

    Ok(Json(SignupResponse {
        message: "User created",
        user: UserSummary::from(&user),
    }))
}
