//! The date × user matrix of logged durations.
//!
//! Rows are kept in ascending date order; columns keep registration order. Both keys are unique.

use crate::codec::{format_date, format_duration, DATE_HEADER};
use crate::error::StorageError;
use chrono::{Duration, NaiveDate};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageTable {
    dates: Vec<NaiveDate>,
    users: Vec<String>,
    /// `cells[row][column]`, one row per entry of `dates`.
    cells: Vec<Vec<Option<Duration>>>,
}

impl UsageTable {
    /// Empty table with the given user columns and no date rows.
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dates: Vec::new(),
            users: users.into_iter().map(Into::into).collect(),
            cells: Vec::new(),
        }
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.user_index(user).is_some()
    }

    pub fn user_index(&self, user: &str) -> Option<usize> {
        self.users.iter().position(|u| u == user)
    }

    pub fn row_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Appends a user column (all cells absent). Fails if the user already has one.
    pub fn add_user(&mut self, user: &str) -> Result<usize, StorageError> {
        if self.has_user(user) {
            return Err(StorageError::AlreadyExists(user.to_string()));
        }
        self.users.push(user.to_string());
        for row in &mut self.cells {
            row.push(None);
        }
        Ok(self.users.len() - 1)
    }

    /// Returns the row index of `date`, inserting an all-absent row in date order if missing.
    pub fn ensure_row(&mut self, date: NaiveDate) -> usize {
        match self.dates.binary_search(&date) {
            Ok(index) => index,
            Err(index) => {
                self.dates.insert(index, date);
                self.cells.insert(index, vec![None; self.users.len()]);
                index
            }
        }
    }

    pub fn get(&self, date: NaiveDate, user: &str) -> Result<Option<Duration>, StorageError> {
        let row = self.row_index(date).ok_or(StorageError::RowNotFound(date))?;
        let column = self
            .user_index(user)
            .ok_or_else(|| StorageError::ColumnNotFound(user.to_string()))?;
        Ok(self.cells[row][column])
    }

    /// Overwrites one existing cell. Both keys must already exist.
    pub fn set(
        &mut self,
        date: NaiveDate,
        user: &str,
        value: Option<Duration>,
    ) -> Result<(), StorageError> {
        let row = self.row_index(date).ok_or(StorageError::RowNotFound(date))?;
        let column = self
            .user_index(user)
            .ok_or_else(|| StorageError::ColumnNotFound(user.to_string()))?;
        self.cells[row][column] = value;
        Ok(())
    }

    /// One user's series over every date row, ascending. `None` if the user has no column.
    pub fn column(&self, user: &str) -> Option<Vec<(NaiveDate, Option<Duration>)>> {
        let column = self.user_index(user)?;
        Some(
            self.dates
                .iter()
                .zip(&self.cells)
                .map(|(date, row)| (*date, row[column]))
                .collect(),
        )
    }

    /// Every user's cell for `date`, in column order. A missing row reads as all absent.
    pub fn row_or_empty(&self, date: NaiveDate) -> Vec<(&str, Option<Duration>)> {
        let row = self.row_index(date).map(|index| &self.cells[index]);
        self.users
            .iter()
            .enumerate()
            .map(|(column, user)| (user.as_str(), row.and_then(|cells| cells[column])))
            .collect()
    }
}

impl fmt::Display for UsageTable {
    /// Fixed-width text grid: header row, then one line per date; absent cells print as `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.dates.len() + 1);
        grid.push(
            std::iter::once(DATE_HEADER.to_string())
                .chain(self.users.iter().cloned())
                .collect(),
        );
        for (date, row) in self.dates.iter().zip(&self.cells) {
            grid.push(
                std::iter::once(format_date(*date))
                    .chain(row.iter().map(|cell| match cell {
                        Some(d) => format_duration(*d),
                        None => "-".to_string(),
                    }))
                    .collect(),
            );
        }

        let widths: Vec<usize> = (0..=self.users.len())
            .map(|c| grid.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();
        for row in &grid {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }
}
