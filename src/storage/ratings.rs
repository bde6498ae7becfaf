//! Rating persistence.

use super::Database;
use crate::models::{RaterEntry, Rating};
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

impl Database {
    /// Create-or-replace keyed by the (user, store) pair. A single statement
    /// against the primary key, so concurrent resubmission by the same user
    /// cannot produce a second row.
    pub fn upsert_rating(&self, user_id: Uuid, store_id: Uuid, value: i64) -> Result<Rating> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO ratings (user_id, store_id, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, store_id) DO UPDATE SET value = excluded.value",
            params![user_id.to_string(), store_id.to_string(), value],
        )
        .context("Failed to upsert rating")?;

        Ok(Rating {
            user_id,
            store_id,
            value,
        })
    }

    /// All rating values for a store, for aggregate computation.
    pub fn rating_values(&self, store_id: Uuid) -> Result<Vec<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM ratings WHERE store_id = ?1")?;
        let values = stmt
            .query_map(params![store_id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    /// One user's rating of a store, if they have submitted one.
    pub fn user_rating(&self, user_id: Uuid, store_id: Uuid) -> Result<Option<i64>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT value FROM ratings WHERE user_id = ?1 AND store_id = ?2",
            params![user_id.to_string(), store_id.to_string()],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query user rating")
    }

    /// Every rater of a store joined with their profile, for the owner view.
    pub fn ratings_with_users(&self, store_id: Uuid) -> Result<Vec<RaterEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.name, u.email, r.value
             FROM ratings r JOIN users u ON u.id = r.user_id
             WHERE r.store_id = ?1",
        )?;
        let entries = stmt
            .query_map(params![store_id.to_string()], |row| {
                let id: String = row.get(0)?;
                Ok(RaterEntry {
                    user_id: Uuid::parse_str(&id).unwrap_or_default(),
                    name: row.get(1)?,
                    email: row.get(2)?,
                    rating: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn count_ratings(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))
            .context("Failed to count ratings")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_db;
    use super::*;
    use crate::auth::models::Role;

    fn seed(db: &Database) -> (Uuid, Uuid) {
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
        let store = db
            .create_store("Quick Mart Downtown Branch", "m@example.com", "a", owner.id)
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
        (rater.id, store.id)
    }

    #[test]
    fn test_upsert_replaces_never_duplicates() {
        let (db, _temp) = test_db();
        let (user_id, store_id) = seed(&db);

        db.upsert_rating(user_id, store_id, 3).unwrap();
        db.upsert_rating(user_id, store_id, 5).unwrap();

        assert_eq!(db.rating_values(store_id).unwrap(), vec![5]);
        assert_eq!(db.count_ratings().unwrap(), 1);
    }

    #[test]
    fn test_user_rating_lookup() {
        let (db, _temp) = test_db();
        let (user_id, store_id) = seed(&db);

        assert_eq!(db.user_rating(user_id, store_id).unwrap(), None);
        db.upsert_rating(user_id, store_id, 4).unwrap();
        assert_eq!(db.user_rating(user_id, store_id).unwrap(), Some(4));
    }

    #[test]
    fn test_ratings_with_users_join() {
        let (db, _temp) = test_db();
        let (user_id, store_id) = seed(&db);

        db.upsert_rating(user_id, store_id, 2).unwrap();

        let entries = db.ratings_with_users(store_id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, user_id);
        assert_eq!(entries[0].email, "rater@example.com");
        assert_eq!(entries[0].rating, 2);
    }
}
