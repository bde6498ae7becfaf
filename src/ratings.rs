//! Rating Aggregator
//! Mission: Enforce one rating per user per store and derive averages

use crate::models::{RaterEntry, Rating, RatingAggregate};
use crate::storage::Database;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// Failures on rating submission, checked before any write.
#[derive(Debug)]
pub enum RatingError {
    InvalidValue,
    StoreNotFound,
    SelfRatingForbidden,
    Storage(anyhow::Error),
}

impl From<RatingError> for crate::error::ApiError {
    fn from(err: RatingError) -> Self {
        use crate::error::ApiError;
        match err {
            RatingError::InvalidValue => ApiError::BadRequest("Rating must be between 1 and 5"),
            RatingError::StoreNotFound => ApiError::NotFound("Store not found"),
            RatingError::SelfRatingForbidden => {
                ApiError::Forbidden("Owners cannot rate their own store")
            }
            RatingError::Storage(e) => ApiError::from(e),
        }
    }
}

pub struct RatingAggregator {
    db: Arc<Database>,
}

impl RatingAggregator {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create or replace the caller's rating for a store. Resubmission
    /// replaces the stored value; it never adds a second row.
    pub fn submit(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        value: i64,
    ) -> Result<Rating, RatingError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(RatingError::InvalidValue);
        }

        let store = self
            .db
            .get_store(store_id)
            .map_err(RatingError::Storage)?
            .ok_or(RatingError::StoreNotFound)?;

        if store.owner_id == user_id {
            return Err(RatingError::SelfRatingForbidden);
        }

        let rating = self
            .db
            .upsert_rating(user_id, store_id, value)
            .map_err(RatingError::Storage)?;

        info!(
            "⭐ Rating submitted: store={} user={} value={}",
            store_id, user_id, value
        );

        Ok(rating)
    }

    /// Average and count for a store, recomputed from current rows on every
    /// call. Nothing is cached.
    pub fn aggregate(&self, store_id: Uuid) -> anyhow::Result<RatingAggregate> {
        let values = self.db.rating_values(store_id)?;
        Ok(RatingAggregate::from_values(&values))
    }

    /// Every rater of a store with their submitted value. The API layer
    /// restricts this to the store's owner.
    pub fn ratings_for_store(&self, store_id: Uuid) -> anyhow::Result<Vec<RaterEntry>> {
        self.db.ratings_with_users(store_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::storage::test_support::test_db;
    use tempfile::NamedTempFile;

    struct Fixture {
        aggregator: RatingAggregator,
        db: Arc<Database>,
        owner_id: Uuid,
        rater_id: Uuid,
        store_id: Uuid,
        _temp: NamedTempFile,
    }

    fn fixture() -> Fixture {
        let (db, temp) = test_db();
        let db = Arc::new(db);

        let owner = db
            .create_user(
                "Store Owner Test Account",
                "owner@example.com",
                "h",
                "addr",
                Role::Owner,
            )
            .unwrap()
            .unwrap();
        let rater = db
            .create_user(
                "Frequent Rater Test Account",
                "rater@example.com",
                "h",
                "addr",
                Role::User,
            )
            .unwrap()
            .unwrap();
        let store = db
            .create_store("Quick Mart Downtown Branch", "m@example.com", "a", owner.id)
            .unwrap();

        Fixture {
            aggregator: RatingAggregator::new(db.clone()),
            db,
            owner_id: owner.id,
            rater_id: rater.id,
            store_id: store.id,
            _temp: temp,
        }
    }

    #[test]
    fn test_value_range_enforced() {
        let f = fixture();

        assert!(matches!(
            f.aggregator.submit(f.rater_id, f.store_id, 0),
            Err(RatingError::InvalidValue)
        ));
        assert!(matches!(
            f.aggregator.submit(f.rater_id, f.store_id, 6),
            Err(RatingError::InvalidValue)
        ));
        assert!(f.aggregator.submit(f.rater_id, f.store_id, 1).is_ok());
        assert!(f.aggregator.submit(f.rater_id, f.store_id, 5).is_ok());
    }

    #[test]
    fn test_unknown_store_rejected() {
        let f = fixture();

        assert!(matches!(
            f.aggregator.submit(f.rater_id, Uuid::new_v4(), 3),
            Err(RatingError::StoreNotFound)
        ));
    }

    #[test]
    fn test_owner_cannot_rate_own_store() {
        let f = fixture();

        for value in 1..=5 {
            assert!(matches!(
                f.aggregator.submit(f.owner_id, f.store_id, value),
                Err(RatingError::SelfRatingForbidden)
            ));
        }
        // And nothing was written.
        assert_eq!(f.db.count_ratings().unwrap(), 0);
    }

    #[test]
    fn test_resubmit_replaces() {
        let f = fixture();

        f.aggregator.submit(f.rater_id, f.store_id, 3).unwrap();
        f.aggregator.submit(f.rater_id, f.store_id, 5).unwrap();

        let agg = f.aggregator.aggregate(f.store_id).unwrap();
        assert_eq!(agg.count, 1);
        assert_eq!(agg.average, 5.0);
    }

    #[test]
    fn test_aggregate_empty_store() {
        let f = fixture();

        let agg = f.aggregator.aggregate(f.store_id).unwrap();
        assert_eq!(agg.average, 0.0);
        assert_eq!(agg.count, 0);
    }

    #[test]
    fn test_aggregate_recomputes_per_call() {
        let f = fixture();
        let second = f
            .db
            .create_user(
                "Another Rater Test Account",
                "second@example.com",
                "h",
                "addr",
                Role::User,
            )
            .unwrap()
            .unwrap();

        f.aggregator.submit(f.rater_id, f.store_id, 4).unwrap();
        assert_eq!(f.aggregator.aggregate(f.store_id).unwrap().average, 4.0);

        f.aggregator.submit(second.id, f.store_id, 5).unwrap();
        let agg = f.aggregator.aggregate(f.store_id).unwrap();
        assert_eq!(agg.average, 4.5);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn test_ratings_for_store_lists_raters() {
        let f = fixture();

        f.aggregator.submit(f.rater_id, f.store_id, 2).unwrap();
        let raters = f.aggregator.ratings_for_store(f.store_id).unwrap();
        assert_eq!(raters.len(), 1);
        assert_eq!(raters[0].user_id, f.rater_id);
        assert_eq!(raters[0].rating, 2);
    }
}
