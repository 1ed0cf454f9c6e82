//! SQLite connection pool wrapper for the storage crate.

use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Manages a single SQLite pool; creates the DB file (and its directory) if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the database file at `database_path` (an optional `sqlite:` / `file:` prefix is accepted).
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        let path = database_path
            .strip_prefix("sqlite:")
            .or_else(|| database_path.strip_prefix("file:"))
            .unwrap_or(database_path);
        info!(path, "Initializing SQLite pool");

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(path);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
