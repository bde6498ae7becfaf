//! User persistence.

use super::Database;
use crate::auth::credentials;
use crate::auth::models::{Role, User};
use crate::models::UserSummary;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::{info, warn};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, address, role, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let role_str: String = row.get(5)?;
    Ok(User {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        address: row.get(4)?,
        role: Role::from_str(&role_str).unwrap_or(Role::User),
        created_at: row.get(6)?,
    })
}

impl Database {
    /// Seed one admin account into an empty deployment so the admin surface
    /// is reachable at all.
    pub(super) fn seed_default_admin(&self) -> Result<()> {
        let conn = self.conn.lock();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE role = 'ADMIN'",
                [],
                |row| row.get(0),
            )
            .context("Failed to check for admin users")?;

        if count == 0 {
            let password_hash = credentials::hash_password("Admin@123")?;
            conn.execute(
                "INSERT INTO users (id, name, email, password_hash, address, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    Uuid::new_v4().to_string(),
                    "System Administrator Account",
                    "admin@storerating.com",
                    password_hash,
                    "Admin Address",
                    Role::Admin.as_str(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("Failed to insert admin user")?;

            info!("🔐 Default admin created (email: admin@storerating.com, password: Admin@123)");
            warn!("⚠️  CHANGE DEFAULT ADMIN PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    /// Insert a new user. Returns None when the email is already registered;
    /// the unique index makes this race-free under concurrent signups.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        address: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            address: address.to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (id, name, email, password_hash, address, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.address,
                user.role.as_str(),
                user.created_at,
            ],
        );

        match result {
            Ok(_) => {
                info!("✅ Created user: {} ({})", user.email, user.role.as_str());
                Ok(Some(user))
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))?;
        stmt.query_row(params![email], user_from_row)
            .optional()
            .context("Failed to query user by email")
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
        stmt.query_row(params![id.to_string()], user_from_row)
            .optional()
            .context("Failed to query user by id")
    }

    pub fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let conn = self.conn.lock();
        let rows = conn.execute(
            "UPDATE users SET password_hash = ?2 WHERE id = ?1",
            params![id.to_string(), password_hash],
        )?;

        if rows == 0 {
            anyhow::bail!("User not found");
        }
        Ok(())
    }

    /// Filtered user listing. Substring filters are case-insensitive; role
    /// is an exact match. No filters returns everyone.
    pub fn list_users_filtered(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
        role: Option<Role>,
    ) -> Result<Vec<UserSummary>> {
        let mut sql =
            String::from("SELECT id, name, email, address, role FROM users WHERE 1=1");
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
        if let Some(role) = role {
            sql.push_str(" AND role = ?");
            args.push(role.as_str().to_string());
        }
        sql.push_str(" ORDER BY created_at, id");

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map(params_from_iter(args.iter()), |row| {
                let id: String = row.get(0)?;
                let role_str: String = row.get(4)?;
                Ok(UserSummary {
                    id: Uuid::parse_str(&id).unwrap_or_default(),
                    name: row.get(1)?,
                    email: row.get(2)?,
                    address: row.get(3)?,
                    role: Role::from_str(&role_str).unwrap_or(Role::User),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_db;
    use crate::auth::models::Role;
    use uuid::Uuid;

    #[test]
    fn test_create_and_retrieve_user() {
        let (db, _temp) = test_db();

        let user = db
            .create_user(
                "Jordan Example Account One",
                "jordan@example.com",
                "$2b$10$hash",
                "5 Sample Street",
                Role::User,
            )
            .unwrap()
            .unwrap();

        let by_email = db.get_user_by_email("jordan@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, Role::User);

        let by_id = db.get_user_by_id(user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "jordan@example.com");

        assert!(db.get_user_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (db, _temp) = test_db();

        db.create_user(
            "Jordan Example Account One",
            "dup@example.com",
            "h1",
            "addr",
            Role::User,
        )
        .unwrap()
        .unwrap();

        let second = db
            .create_user(
                "Morgan Example Account Two",
                "dup@example.com",
                "h2",
                "addr",
                Role::Owner,
            )
            .unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_update_password() {
        let (db, _temp) = test_db();

        let user = db
            .create_user(
                "Jordan Example Account One",
                "jordan@example.com",
                "old-hash",
                "addr",
                Role::User,
            )
            .unwrap()
            .unwrap();

        db.update_password(user.id, "new-hash").unwrap();
        let reloaded = db.get_user_by_id(user.id).unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");

        assert!(db.update_password(Uuid::new_v4(), "x").is_err());
    }

    #[test]
    fn test_list_users_filtered() {
        let (db, _temp) = test_db();

        db.create_user(
            "Jordan Example Account One",
            "jordan@example.com",
            "h",
            "North Side Apartment",
            Role::User,
        )
        .unwrap();
        db.create_user(
            "Morgan Example Account Two",
            "morgan@shops.example.com",
            "h",
            "South Side House",
            Role::Owner,
        )
        .unwrap();

        // No filters: everyone, including the seeded admin.
        assert_eq!(db.list_users_filtered(None, None, None, None).unwrap().len(), 3);

        // Case-insensitive substring on name.
        let jordans = db
            .list_users_filtered(Some("jordan"), None, None, None)
            .unwrap();
        assert_eq!(jordans.len(), 1);
        assert_eq!(jordans[0].email, "jordan@example.com");

        // Exact role match.
        let owners = db
            .list_users_filtered(None, None, None, Some(Role::Owner))
            .unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].role, Role::Owner);

        // Address substring.
        let south = db
            .list_users_filtered(None, None, Some("south"), None)
            .unwrap();
        assert_eq!(south.len(), 1);
    }
}
