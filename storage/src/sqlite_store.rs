//! SQLite backend: the usage table normalised into users, days and usage rows.
//!
//! External: SQLite via sqlx. Column order is the insertion order of `users.position`.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::codec::{format_date, parse_date};
use crate::error::StorageError;
use crate::models::UsageTable;
use crate::repository::UsageStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteUsageStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteUsageStore {
    pub async fn new(database_path: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_path).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating usage tables if not exist");
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                position INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE TABLE IF NOT EXISTS days (day TEXT PRIMARY KEY)")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage (
                day TEXT NOT NULL,
                username TEXT NOT NULL,
                seconds INTEGER NOT NULL,
                PRIMARY KEY (day, username)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn day_exists(&self, day: &str) -> Result<bool, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT day FROM days WHERE day = ?")
            .bind(day)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(row.is_some())
    }

    async fn user_exists(&self, username: &str) -> Result<bool, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT username FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(row.is_some())
    }
}

fn parse_stored_day(day: &str) -> Result<NaiveDate, StorageError> {
    parse_date(day).ok_or_else(|| StorageError::Malformed(format!("stored day '{}'", day)))
}

#[async_trait]
impl UsageStore for SqliteUsageStore {
    async fn load_table(&self) -> Result<UsageTable, StorageError> {
        let pool = self.pool_manager.pool();

        let users: Vec<(String,)> = sqlx::query_as("SELECT username FROM users ORDER BY position")
            .fetch_all(pool)
            .await?;
        let days: Vec<(String,)> = sqlx::query_as("SELECT day FROM days ORDER BY day")
            .fetch_all(pool)
            .await?;
        let cells: Vec<(String, String, i64)> =
            sqlx::query_as("SELECT day, username, seconds FROM usage")
                .fetch_all(pool)
                .await?;

        let mut table = UsageTable::with_users(users.into_iter().map(|(u,)| u));
        for (day,) in &days {
            table.ensure_row(parse_stored_day(day)?);
        }
        for (day, username, seconds) in cells {
            let date = parse_stored_day(&day)?;
            // Orphan cells (no day or user row) are not part of the table.
            if table.row_index(date).is_some() && table.has_user(&username) {
                let value = Duration::try_seconds(seconds).ok_or_else(|| {
                    StorageError::Malformed(format!("seconds out of range: {}", seconds))
                })?;
                table.set(date, &username, Some(value))?;
            }
        }

        debug!(
            users = table.users().len(),
            days = table.dates().len(),
            "Loaded usage table from SQLite"
        );
        Ok(table)
    }

    async fn write_cell(
        &self,
        date: NaiveDate,
        user: &str,
        value: Duration,
    ) -> Result<(), StorageError> {
        let day = format_date(date);
        if !self.day_exists(&day).await? {
            return Err(StorageError::RowNotFound(date));
        }
        if !self.user_exists(user).await? {
            return Err(StorageError::ColumnNotFound(user.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO usage (day, username, seconds) VALUES (?, ?, ?)
            ON CONFLICT(day, username) DO UPDATE SET seconds = excluded.seconds
            "#,
        )
        .bind(&day)
        .bind(user)
        .bind(value.num_seconds())
        .execute(self.pool_manager.pool())
        .await?;

        info!(day = %day, username = %user, seconds = value.num_seconds(), "Saved usage cell");
        Ok(())
    }

    async fn append_user_column(&self, username: &str) -> Result<(), StorageError> {
        if self.user_exists(username).await? {
            return Err(StorageError::AlreadyExists(username.to_string()));
        }
        sqlx::query("INSERT INTO users (username) VALUES (?)")
            .bind(username)
            .execute(self.pool_manager.pool())
            .await?;
        info!(username = %username, "Added user column");
        Ok(())
    }

    async fn append_date_row(&self, date: NaiveDate) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO days (day) VALUES (?)")
            .bind(format_date(date))
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}
