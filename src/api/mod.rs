//! HTTP route handlers, grouped by resource.

pub mod admin;
pub mod owner;
pub mod ratings;
pub mod stores;

use crate::error::ApiError;
use uuid::Uuid;

/// Parse a path or body id, rejecting anything that is not a UUID.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid id format"))
}
