use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use crate::error::StorageError;
use crate::models::UsageTable;

/// Data access to the usage table, whatever the backend.
///
/// Writes address cells by key (date, username). Implementations resolve keys against freshly
/// loaded data and report `RowNotFound` / `ColumnNotFound` instead of creating anything implicitly.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Loads the whole table. Unparseable duration cells read as absent.
    async fn load_table(&self) -> Result<UsageTable, StorageError>;

    /// Registered usernames in column order.
    async fn users(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.load_table().await?.users().to_vec())
    }

    async fn cell(&self, date: NaiveDate, user: &str) -> Result<Option<Duration>, StorageError> {
        self.load_table().await?.get(date, user)
    }

    /// Overwrites the (date, user) cell.
    async fn write_cell(
        &self,
        date: NaiveDate,
        user: &str,
        value: Duration,
    ) -> Result<(), StorageError>;

    /// Adds a user column after the last one. `AlreadyExists` if the user has a column.
    async fn append_user_column(&self, username: &str) -> Result<(), StorageError>;

    /// Creates the date row if it does not exist yet; a no-op otherwise.
    async fn append_date_row(&self, date: NaiveDate) -> Result<(), StorageError>;
}
