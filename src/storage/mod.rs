//! SQLite Persistence Layer
//! Mission: One database file for users, stores, and ratings
//!
//! The engine enforces what the domain relies on: unique emails, the
//! unique (user, store) rating pair, and store deletion cascading into
//! ratings.

mod ratings;
mod stores;
mod users;

use anyhow::{Context, Result};
use parking_lot::Mutex; // Faster than std::sync::Mutex
use rusqlite::{Connection, OpenFlags};
use std::sync::Arc;

const SCHEMA_SQL: &str = r#"
-- WAL for concurrent reads during writes
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    address TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS stores (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    address TEXT NOT NULL,
    owner_id TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_stores_owner ON stores(owner_id);

-- The primary key IS the one-rating-per-user-per-store rule.
CREATE TABLE IF NOT EXISTS ratings (
    user_id TEXT NOT NULL REFERENCES users(id),
    store_id TEXT NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    value INTEGER NOT NULL,
    PRIMARY KEY (user_id, store_id)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_ratings_store ON ratings(store_id);
"#;

/// Shared SQLite handle. A single connection; callers serialize through
/// the lock.
pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database, apply the schema, and seed the first
    /// admin account if none exists.
    pub fn open(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply schema")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.seed_default_admin()?;

        Ok(db)
    }
}
