//! Authentication & Self-Service Endpoints
//! Mission: Signup, login, profile, and password change

use crate::auth::{
    credentials,
    middleware::caller_id,
    models::{
        ChangePasswordRequest, Claims, LoginRequest, LoginResponse, Role, SignupRequest,
        SignupResponse,
    },
};
use crate::error::ApiError;
use crate::models::{MessageResponse, UserSummary};
use crate::state::AppState;
use axum::{extract::State, Extension, Json};
use tracing::{info, warn};

/// Signup endpoint - POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let name = credentials::require(payload.name.as_deref(), "name")?;
    let email = credentials::require(payload.email.as_deref(), "email")?;
    let password = credentials::require(payload.password.as_deref(), "password")?;
    let address = credentials::require(payload.address.as_deref(), "address")?;

    credentials::validate_signup(name, email, password, address)?;

    let password_hash = credentials::hash_password(password)?;
    let user = state
        .db
        .create_user(name, email, &password_hash, address, Role::User)?
        .ok_or(ApiError::Conflict("Email already registered"))?;

    Ok(Json(SignupResponse {
        message: "User created",
        user: UserSummary::from(&user),
    }))
}

/// Login endpoint - POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = credentials::require(payload.email.as_deref(), "email")?;
    let password = credentials::require(payload.password.as_deref(), "password")?;

    let user = state
        .db
        .get_user_by_email(email)?
        .ok_or(ApiError::NotFound("User not found"))?;

    let valid = credentials::verify_password(password, &user.password_hash)?;
    if !valid {
        warn!("❌ Failed login attempt: {}", email);
        return Err(ApiError::Unauthorized("Invalid password"));
    }

    let token = state.jwt.issue(user.id, user.role)?;

    info!("✅ Login successful: {} ({})", user.email, user.role.as_str());

    Ok(Json(LoginResponse {
        message: "Login success",
        token,
        user: UserSummary::from(&user),
    }))
}

/// Current user's profile - GET /user/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserSummary>, ApiError> {
    let id = caller_id(&claims)?;
    let user = state
        .db
        .get_user_by_id(id)?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserSummary::from(&user)))
}

/// Password change, scoped to the caller - PUT /user/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let password = credentials::require(payload.password.as_deref(), "password")?;
    credentials::validate_password(password)?;

    let password_hash = credentials::hash_password(password)?;
    state.db.update_password(caller_id(&claims)?, &password_hash)?;

    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}
