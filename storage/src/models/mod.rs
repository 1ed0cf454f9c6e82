//! Data model of the usage store.

mod usage_table;

pub use usage_table::UsageTable;
