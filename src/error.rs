//! API Error Taxonomy
//! Mission: Map every failure to a status code at the transport boundary

use crate::auth::credentials::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-level failures. Handlers return these; the HTTP mapping lives
/// here and nowhere else.
#[derive(Debug)]
pub enum ApiError {
    /// 400, structured signup/store field validation
    Validation(ValidationError),
    /// 400, other client-correctable input
    BadRequest(&'static str),
    /// 401, missing/invalid/expired credential
    Unauthorized(&'static str),
    /// 403, authenticated but not permitted
    Forbidden(&'static str),
    /// 404, referenced entity absent
    NotFound(&'static str),
    /// Uniqueness violation. 400 on the wire, per the public contract.
    Conflict(&'static str),
    /// 500, unexpected persistence or runtime failure
    Internal,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Log the detail here; the response body stays generic.
        error!("internal error: {:#}", err);
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.to_string()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.to_string()),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.to_string()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.to_string()),
            ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation(ValidationError::NameLength).into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::BadRequest("bad").into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("no").into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("denied").into_response(),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("gone").into_response(),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Conflict("taken").into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal.into_response(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }
}
