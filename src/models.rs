//! Domain models and wire shapes shared across the API surface.
//!
//! Response structs serialize with the camelCase field names clients
//! already consume.

use crate::auth::models::{Role, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store record. The owner is fixed at creation and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Uuid,
    pub created_at: String,
}

/// A single user's rating of a store, unique per (user, store) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub value: i64,
}

/// Derived (average, count) pair for a store. Computed on demand, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: usize,
}

impl RatingAggregate {
    /// Arithmetic mean rounded to one decimal; 0.0 with count 0 when there
    /// are no ratings.
    pub fn from_values(values: &[i64]) -> Self {
        if values.is_empty() {
            return Self {
                average: 0.0,
                count: 0,
            };
        }
        let sum: i64 = values.iter().sum();
        let average = sum as f64 / values.len() as f64;
        Self {
            average: (average * 10.0).round() / 10.0,
            count: values.len(),
        }
    }
}

/// Owner block embedded in store listings.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Store plus derived rating stats: the directory listing row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithStats {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummary>,
    pub average_rating: f64,
    pub rating_count: usize,
}

/// Store detail view, including the caller's own rating if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetails {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner: Option<OwnerSummary>,
    pub average_rating: f64,
    pub rating_count: usize,
    pub user_rating: Option<i64>,
}

/// One rater row as the store owner sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaterEntry {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: i64,
}

/// User summary: everything except the credential.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            role: user.role,
        }
    }
}

/// Paginated store directory response.
#[derive(Debug, Serialize)]
pub struct StorePage {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub stores: Vec<StoreWithStats>,
}

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
}

/// Query filters for the public store directory.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListFilter {
    pub search: Option<String>,
    pub min_rating: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query filters for the admin user directory. Absent fields impose no
/// constraint.
#[derive(Debug, Default, Deserialize)]
pub struct UserListFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

/// Query filters for the admin store directory.
#[derive(Debug, Default, Deserialize)]
pub struct StoreAdminFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Bare acknowledgement for mutations with no payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
