//! Store persistence.

use super::Database;
use crate::models::Store;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const STORE_COLUMNS: &str = "id, name, email, address, owner_id, created_at";

fn store_from_row(row: &Row<'_>) -> rusqlite::Result<Store> {
    let id: String = row.get(0)?;
    let owner_id: String = row.get(4)?;
    Ok(Store {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        name: row.get(1)?,
        email: row.get(2)?,
        address: row.get(3)?,
        owner_id: Uuid::parse_str(&owner_id).unwrap_or_default(),
        created_at: row.get(5)?,
    })
}

impl Database {
    pub fn create_store(
        &self,
        name: &str,
        email: &str,
        address: &str,
        owner_id: Uuid,
    ) -> Result<Store> {
        let store = Store {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            owner_id,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO stores (id, name, email, address, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                store.id.to_string(),
                store.name,
                store.email,
                store.address,
                store.owner_id.to_string(),
                store.created_at,
            ],
        )
        .context("Failed to insert store")?;

        info!("✅ Created store: {} (owner {})", store.name, store.owner_id);

        Ok(store)
    }

    pub fn get_store(&self, id: Uuid) -> Result<Option<Store>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"))?;
        stmt.query_row(params![id.to_string()], store_from_row)
            .optional()
            .context("Failed to query store")
    }

    /// Partial update: absent fields keep their current values. Returns the
    /// updated row, or None if the store no longer exists.
    pub fn update_store(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<Store>> {
        {
            let conn = self.conn.lock();
            conn.execute(
                "UPDATE stores SET
                     name = COALESCE(?2, name),
                     email = COALESCE(?3, email),
                     address = COALESCE(?4, address)
                 WHERE id = ?1",
                params![id.to_string(), name, email, address],
            )
            .context("Failed to update store")?;
        }

        self.get_store(id)
    }

    /// Delete a store; ratings go with it via the cascade. Returns whether a
    /// row was removed.
    pub fn delete_store(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn
            .execute("DELETE FROM stores WHERE id = ?1", params![id.to_string()])
            .context("Failed to delete store")?;

        if rows > 0 {
            info!("🗑️  Deleted store: {}", id);
        }
        Ok(rows > 0)
    }

    pub fn stores_by_owner(&self, owner_id: Uuid) -> Result<Vec<Store>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE owner_id = ?1 ORDER BY created_at, id"
        ))?;
        let stores = stmt
            .query_map(params![owner_id.to_string()], store_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stores)
    }

    /// One page of the store directory in creation order, optionally
    /// narrowed by a case-insensitive name substring.
    pub fn list_stores_page(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Store>> {
        let conn = self.conn.lock();
        let stores = match search {
            Some(search) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {STORE_COLUMNS} FROM stores
                     WHERE name LIKE '%' || ?1 || '%'
                     ORDER BY created_at, id LIMIT ?2 OFFSET ?3"
                ))?;
                let result = stmt
                    .query_map(params![search, limit, offset], store_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                result
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {STORE_COLUMNS} FROM stores
                     ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
                ))?;
                let result = stmt
                    .query_map(params![limit, offset], store_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                result
            }
        };
        Ok(stores)
    }

    /// Unpaginated listing for the admin directory, any combination of
    /// case-insensitive substring filters.
    pub fn list_stores_filtered(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
    ) -> Result<Vec<Store>> {
        let mut sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE 1=1");
        let mut args: Vec<String> = Vec::new();

        if let Some(name) = name {
            sql.push_str(" AND name LIKE '%' || ? || '%'");
            args.push(name.to_string());
        }
        if let Some(email) = email {
            sql.push_str(" AND email LIKE '%' || ? || '%'");
            args.push(email.to_string());
        }
        if let Some(address) = address {
            sql.push_str(" AND address LIKE '%' || ? || '%'");
            args.push(address.to_string());
        }
        sql.push_str(" ORDER BY created_at, id");

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let stores = stmt
            .query_map(params_from_iter(args.iter()), store_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stores)
    }

    pub fn count_stores(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))
            .context("Failed to count stores")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_db;
    use super::*;
    use crate::auth::models::Role;

    fn seed_owner(db: &Database) -> Uuid {
        db.create_user(
            "Store Owner Test Account",
            "owner@example.com",
            "h",
            "addr",
            Role::Owner,
        )
        .unwrap()
        .unwrap()
        .id
    }

    #[test]
    fn test_create_get_update_delete() {
        let (db, _temp) = test_db();
        let owner_id = seed_owner(&db);

        let store = db
            .create_store(
                "Quick Mart Downtown Branch",
                "mart@example.com",
                "12 Market Square",
                owner_id,
            )
            .unwrap();

        let fetched = db.get_store(store.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Quick Mart Downtown Branch");
        assert_eq!(fetched.owner_id, owner_id);

        // Partial update keeps absent fields.
        let updated = db
            .update_store(store.id, None, Some("new@example.com"), None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Quick Mart Downtown Branch");
        assert_eq!(updated.email, "new@example.com");

        assert!(db.delete_store(store.id).unwrap());
        assert!(db.get_store(store.id).unwrap().is_none());
        assert!(!db.delete_store(store.id).unwrap());
    }

    #[test]
    fn test_delete_cascades_into_ratings() {
        let (db, _temp) = test_db();
        let owner_id = seed_owner(&db);
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
            .create_store("Quick Mart Downtown Branch", "m@example.com", "a", owner_id)
            .unwrap();
        db.upsert_rating(rater.id, store.id, 4).unwrap();
        assert_eq!(db.count_ratings().unwrap(), 1);

        db.delete_store(store.id).unwrap();
        assert_eq!(db.count_ratings().unwrap(), 0);
    }

    #[test]
    fn test_list_stores_page_search_and_window() {
        let (db, _temp) = test_db();
        let owner_id = seed_owner(&db);

        for i in 0..7 {
            db.create_store(
                &format!("Corner Mart Number {i:02} Branch"),
                "m@example.com",
                "a",
                owner_id,
            )
            .unwrap();
        }
        db.create_store(
            "Totally Different Grocer Ltd",
            "g@example.com",
            "a",
            owner_id,
        )
        .unwrap();

        // Case-insensitive substring.
        let marts = db.list_stores_page(Some("mart"), 100, 0).unwrap();
        assert_eq!(marts.len(), 7);

        // Window in creation order.
        let page_one = db.list_stores_page(None, 5, 0).unwrap();
        let page_two = db.list_stores_page(None, 5, 5).unwrap();
        assert_eq!(page_one.len(), 5);
        assert_eq!(page_two.len(), 3);
        assert_eq!(page_one[0].name, "Corner Mart Number 00 Branch");
    }

    #[test]
    fn test_list_stores_filtered() {
        let (db, _temp) = test_db();
        let owner_id = seed_owner(&db);

        db.create_store(
            "Harbor View Fish Market",
            "fish@harbor.example.com",
            "1 Pier Road",
            owner_id,
        )
        .unwrap();
        db.create_store(
            "Uptown Organic Grocery Co",
            "hello@uptown.example.com",
            "9 High Street",
            owner_id,
        )
        .unwrap();

        assert_eq!(db.list_stores_filtered(None, None, None).unwrap().len(), 2);
        assert_eq!(
            db.list_stores_filtered(Some("harbor"), None, None).unwrap().len(),
            1
        );
        assert_eq!(
            db.list_stores_filtered(None, Some("uptown"), None).unwrap().len(),
            1
        );
        assert_eq!(
            db.list_stores_filtered(None, None, Some("pier")).unwrap().len(),
            1
        );
    }
}
