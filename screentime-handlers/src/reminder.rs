//! Who has logged a given day and who has not.

use chrono::{Duration, NaiveDate};
use storage::{StorageError, UsageStore, UsageTable};

use crate::clock::{yesterday, Clock};
use crate::messages;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub done: Vec<String>,
    pub pending: Vec<String>,
}

impl ReminderReport {
    /// Partitions the registered users by whether their cell for `date` is present. A missing
    /// row counts as empty.
    pub fn for_date(table: &UsageTable, date: NaiveDate) -> Self {
        let (done, pending): (Vec<_>, Vec<_>) = table
            .row_or_empty(date)
            .into_iter()
            .partition(|(_, value)| value.is_some());
        Self {
            done: handles(done),
            pending: handles(pending),
        }
    }

    /// Loads the table and builds the report for yesterday.
    pub async fn yesterday(store: &dyn UsageStore, clock: &dyn Clock) -> Result<Self, StorageError> {
        let table = store.load_table().await?;
        Ok(Self::for_date(&table, yesterday(clock)))
    }

    /// Reply text for the report.
    pub fn message(&self) -> String {
        match (self.done.as_slice(), self.pending.as_slice()) {
            ([], []) => messages::NO_USERS.to_string(),
            ([], _) => messages::NOBODY_LOGGED.to_string(),
            (_, []) => messages::EVERYBODY_LOGGED.to_string(),
            (_, [single]) => messages::single_pending(single),
            (done, pending) => messages::partial(done, pending),
        }
    }
}

fn handles(cells: Vec<(&str, Option<Duration>)>) -> Vec<String> {
    cells.into_iter().map(|(user, _)| format!("@{}", user)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn table(logged: &[&str]) -> UsageTable {
        let mut t = UsageTable::with_users(["anna", "pau", "marc"]);
        t.ensure_row(day());
        for u in logged {
            t.set(day(), u, Some(Duration::minutes(30))).unwrap();
        }
        t
    }

    #[test]
    fn test_missing_row_means_everyone_pending() {
        let t = UsageTable::with_users(["anna", "pau"]);
        let report = ReminderReport::for_date(&t, day());
        assert!(report.done.is_empty());
        assert_eq!(report.pending, vec!["@anna", "@pau"]);
        assert_eq!(report.message(), messages::NOBODY_LOGGED);
    }

    #[test]
    fn test_single_pending_is_called_out() {
        let report = ReminderReport::for_date(&table(&["anna", "marc"]), day());
        assert_eq!(report.pending, vec!["@pau"]);
        assert_eq!(report.message(), messages::single_pending("@pau"));
    }

    #[test]
    fn test_single_done_lists_both_groups() {
        let report = ReminderReport::for_date(&table(&["pau"]), day());
        assert_eq!(report.done, vec!["@pau"]);
        assert_eq!(report.message(), "@pau already logged, still missing @anna, @marc.");
    }

    #[test]
    fn test_everybody_and_nobody() {
        let all = ReminderReport::for_date(&table(&["anna", "pau", "marc"]), day());
        assert_eq!(all.message(), messages::EVERYBODY_LOGGED);
        let empty = ReminderReport::for_date(&UsageTable::default(), day());
        assert_eq!(empty.message(), messages::NO_USERS);
    }
}
