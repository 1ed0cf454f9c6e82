//! In-process store, used for demos (`STORAGE_BACKEND=memory`) and tests.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::models::UsageTable;
use crate::repository::UsageStore;

#[derive(Default)]
pub struct MemoryUsageStore {
    table: RwLock<UsageTable>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: UsageTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn load_table(&self) -> Result<UsageTable, StorageError> {
        Ok(self.table.read().await.clone())
    }

    async fn write_cell(
        &self,
        date: NaiveDate,
        user: &str,
        value: Duration,
    ) -> Result<(), StorageError> {
        self.table.write().await.set(date, user, Some(value))
    }

    async fn append_user_column(&self, username: &str) -> Result<(), StorageError> {
        self.table.write().await.add_user(username).map(|_| ())
    }

    async fn append_date_row(&self, date: NaiveDate) -> Result<(), StorageError> {
        self.table.write().await.ensure_row(date);
        Ok(())
    }
}
