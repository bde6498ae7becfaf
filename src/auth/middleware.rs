//! Authentication Middleware
//! Mission: Resolve caller identity before protected handlers run

use crate::auth::{
    jwt::JwtHandler,
    models::{Claims, Role},
};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Auth middleware that validates bearer tokens and stores the claims in
/// request extensions for handlers to pick up.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = jwt_handler
        .verify(token)
        .map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get("Authorization")
        .ok_or(AuthError::MissingToken)?;
    let header = header.to_str().map_err(|_| AuthError::MalformedToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedToken)?;
    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }
    Ok(token)
}

/// Authentication failures, all 401. Authorization failures are 403 and
/// live with the guards below.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    MalformedToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "No token provided",
            AuthError::MalformedToken => "Invalid token format. Use: Bearer <token>",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Caller id from verified claims. Tokens are only issued with a real user
/// id, so a non-parseable subject means the token is not one of ours.
pub fn caller_id(claims: &Claims) -> Result<Uuid, ApiError> {
    claims
        .user_id()
        .ok_or(ApiError::Unauthorized("Invalid or expired token"))
}

/// Role gate for admin-only endpoints. Exhaustive so a new role can never
/// fall through permissively.
pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    match claims.role {
        Role::Admin => Ok(()),
        Role::Owner | Role::User => Err(ApiError::Forbidden("Access denied. Admins only.")),
    }
}

/// Role gate for owner-only endpoints.
pub fn require_owner_role(claims: &Claims) -> Result<(), ApiError> {
    match claims.role {
        Role::Owner => Ok(()),
        Role::Admin | Role::User => {
            Err(ApiError::Forbidden("Access denied. Store owners only."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingToken));
        assert_eq!(
            bearer_token(&headers_with("Token abc")),
            Err(AuthError::MalformedToken)
        );
        assert_eq!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::MalformedToken)
        );
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_auth_error_responses() {
        assert_eq!(
            AuthError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MalformedToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_role_guards() {
        let claims = |role| Claims {
            sub: Uuid::new_v4().to_string(),
            role,
            exp: usize::MAX,
        };

        assert!(require_admin(&claims(Role::Admin)).is_ok());
        assert!(require_admin(&claims(Role::Owner)).is_err());
        assert!(require_admin(&claims(Role::User)).is_err());

        assert!(require_owner_role(&claims(Role::Owner)).is_ok());
        assert!(require_owner_role(&claims(Role::Admin)).is_err());
        assert!(require_owner_role(&claims(Role::User)).is_err());
    }
}
