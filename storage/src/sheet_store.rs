//! Google Sheets backend (Sheets v4 values API).
//!
//! Sheet layout: row 1 is the header (`Dia`, then one username per column); every later row starts
//! with a date followed by `HH:MM:SS` cells. Storage coordinates are 1-based and offset by one
//! header row and one date column, so cell (date row r, user column c) lives at (r + 2, c + 2).
//! Every write resolves coordinates against a fresh read of the sheet.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::codec::{a1_notation, format_date, format_duration, parse_date, parse_duration, DATE_HEADER};
use crate::error::StorageError;
use crate::models::UsageTable;
use crate::repository::UsageStore;

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Connection settings for one worksheet of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub api_url: String,
    pub spreadsheet_id: String,
    pub worksheet: String,
    /// OAuth bearer token with the spreadsheets scope.
    pub access_token: String,
}

pub struct SheetUsageStore {
    client: reqwest::Client,
    config: SheetConfig,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Physical layout of the sheet as last read: where each date row and user column sits.
#[derive(Debug, Default)]
struct SheetLayout {
    users: Vec<String>,
    /// Date of each data row in sheet order (`None` for blank rows).
    rows: Vec<Option<NaiveDate>>,
}

impl SheetLayout {
    fn row_number(&self, date: NaiveDate) -> Option<usize> {
        self.rows.iter().position(|d| *d == Some(date)).map(|i| i + 2)
    }

    fn column_number(&self, user: &str) -> Option<usize> {
        self.users.iter().position(|u| u == user).map(|i| i + 2)
    }
}

/// Parses the raw grid into the table and its physical layout.
fn parse_grid(values: Vec<Vec<String>>) -> Result<(UsageTable, SheetLayout), StorageError> {
    let mut rows = values.into_iter();
    let header = rows.next().unwrap_or_default();

    if let Some(first) = header.first() {
        if first.trim() != DATE_HEADER {
            warn!(header = %first, expected = DATE_HEADER, "Unexpected date column header");
        }
    }
    // Users run until the first unused header cell.
    let users: Vec<String> = header
        .iter()
        .skip(1)
        .map(|cell| cell.trim())
        .take_while(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect();

    let mut table = UsageTable::with_users(users.iter().cloned());
    let mut layout = SheetLayout {
        users,
        rows: Vec::new(),
    };

    for row in rows {
        let date_cell = row.first().map(|s| s.trim()).unwrap_or("");
        if date_cell.is_empty() {
            layout.rows.push(None);
            continue;
        }
        let date = parse_date(date_cell)
            .ok_or_else(|| StorageError::Malformed(format!("date cell '{}'", date_cell)))?;
        if table.row_index(date).is_some() {
            return Err(StorageError::Malformed(format!("duplicate date row {}", date)));
        }
        table.ensure_row(date);
        for (index, user) in layout.users.iter().enumerate() {
            let value = row.get(index + 1).and_then(|cell| parse_duration(cell));
            table.set(date, user, value)?;
        }
        layout.rows.push(Some(date));
    }

    Ok((table, layout))
}

impl SheetUsageStore {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn values_url(&self, range: &str) -> Result<Url, StorageError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| StorageError::Malformed(format!("sheets api url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Malformed("sheets api url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(&[
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                range,
            ]);
        Ok(url)
    }

    fn check_status(status: StatusCode) -> Result<(), StorageError> {
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::BackendUnavailable(format!(
                "sheets authentication rejected ({})",
                status
            )));
        }
        Err(StorageError::BackendUnavailable(format!(
            "sheets api returned {}",
            status
        )))
    }

    #[instrument(skip(self), fields(worksheet = %self.config.worksheet))]
    async fn fetch(&self) -> Result<(UsageTable, SheetLayout), StorageError> {
        let url = self.values_url(&quote_sheet_name(&self.config.worksheet))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| StorageError::BackendUnavailable(e.to_string()))?;
        Self::check_status(response.status())?;

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| StorageError::Malformed(format!("sheets response: {}", e)))?;
        debug!(rows = range.values.len(), "Fetched sheet values");
        parse_grid(range.values)
    }

    async fn update_cell(&self, row: usize, column: usize, text: String) -> Result<(), StorageError> {
        let range = format!(
            "{}!{}",
            quote_sheet_name(&self.config.worksheet),
            a1_notation(row, column)
        );
        let url = self.values_url(&range)?;
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.config.access_token)
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [[text]],
            }))
            .send()
            .await
            .map_err(|e| StorageError::BackendUnavailable(e.to_string()))?;
        Self::check_status(response.status())?;
        info!(range = %range, "Updated sheet cell");
        Ok(())
    }
}

#[async_trait]
impl UsageStore for SheetUsageStore {
    async fn load_table(&self) -> Result<UsageTable, StorageError> {
        self.fetch().await.map(|(table, _)| table)
    }

    async fn write_cell(
        &self,
        date: NaiveDate,
        user: &str,
        value: Duration,
    ) -> Result<(), StorageError> {
        let (_, layout) = self.fetch().await?;
        let row = layout.row_number(date).ok_or(StorageError::RowNotFound(date))?;
        let column = layout
            .column_number(user)
            .ok_or_else(|| StorageError::ColumnNotFound(user.to_string()))?;
        self.update_cell(row, column, format_duration(value)).await
    }

    async fn append_user_column(&self, username: &str) -> Result<(), StorageError> {
        let (_, layout) = self.fetch().await?;
        if layout.column_number(username).is_some() {
            return Err(StorageError::AlreadyExists(username.to_string()));
        }
        self.update_cell(1, layout.users.len() + 2, username.to_string())
            .await
    }

    async fn append_date_row(&self, date: NaiveDate) -> Result<(), StorageError> {
        let (_, layout) = self.fetch().await?;
        if layout.row_number(date).is_some() {
            return Ok(());
        }
        self.update_cell(layout.rows.len() + 2, 1, format_date(date))
            .await
    }
}

/// Worksheet name as an A1 range prefix: single-quoted, embedded quotes doubled.
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("database"), "'database'");
        assert_eq!(quote_sheet_name("My sheet"), "'My sheet'");
        assert_eq!(quote_sheet_name("Anna's"), "'Anna''s'");
        assert_eq!(format!("{}!{}", quote_sheet_name("My sheet"), a1_notation(3, 2)), "'My sheet'!B3");
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_grid_reads_users_rows_and_cells() {
        let (table, layout) = parse_grid(grid(&[
            &["Dia", "anna", "pau"],
            &["2024-05-01", "07:30:00", ""],
            &["2024-05-02", "garbage"],
        ]))
        .unwrap();

        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(table.users(), &["anna".to_string(), "pau".to_string()]);
        assert_eq!(table.get(d1, "anna").unwrap(), Some(Duration::minutes(450)));
        assert_eq!(table.get(d1, "pau").unwrap(), None);
        assert_eq!(table.get(d2, "anna").unwrap(), None);
        assert_eq!(layout.row_number(d2), Some(3));
        assert_eq!(layout.column_number("pau"), Some(3));
    }

    #[test]
    fn test_parse_grid_stops_users_at_first_blank_header() {
        let (table, layout) = parse_grid(grid(&[&["Dia", "anna", "", "ghost"]])).unwrap();
        assert_eq!(table.users(), &["anna".to_string()]);
        assert_eq!(layout.users.len(), 1);
    }

    #[test]
    fn test_parse_grid_empty_sheet() {
        let (table, layout) = parse_grid(Vec::new()).unwrap();
        assert!(table.users().is_empty());
        assert!(layout.rows.is_empty());
    }

    #[test]
    fn test_parse_grid_rejects_bad_or_duplicate_dates() {
        assert!(matches!(
            parse_grid(grid(&[&["Dia", "anna"], &["someday", "01:00:00"]])),
            Err(StorageError::Malformed(_))
        ));
        assert!(matches!(
            parse_grid(grid(&[&["Dia"], &["2024-05-01"], &["2024-05-01"]])),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_blank_rows_keep_physical_positions() {
        let (_, layout) = parse_grid(grid(&[&["Dia"], &[""], &["2024-05-03"]])).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_eq!(layout.row_number(d3), Some(4));
    }
}
