//! Storage crate: the date × user usage table and the backends that persist it.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`codec`] – Cell text codecs (durations, dates, A1 notation)
//! - [`models`] – UsageTable
//! - [`repository`] – UsageStore trait
//! - [`sheet_store`] – SheetUsageStore (Google Sheets values API)
//! - [`sqlite_store`] – SqliteUsageStore (SQLite via sqlx)
//! - [`memory_store`] – MemoryUsageStore
//! - [`sqlite_pool`] – SqlitePoolManager

pub mod codec;
mod error;
mod memory_store;
mod models;
mod repository;
mod sheet_store;
mod sqlite_pool;
mod sqlite_store;

pub use codec::{format_date, format_duration, parse_date, parse_duration, DATE_HEADER};
pub use error::StorageError;
pub use memory_store::MemoryUsageStore;
pub use models::UsageTable;
pub use repository::UsageStore;
pub use sheet_store::{SheetConfig, SheetUsageStore, DEFAULT_SHEETS_API_URL};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteUsageStore;
