//! Text reports over the usage table.

use storage::UsageTable;
use usage_stats::{stats, trend, TrendWindow};

use crate::messages;

/// Summary replies for `user`: the four summary lines, or a single "nothing logged" line.
pub fn summary_messages(table: &UsageTable, user: &str) -> Vec<String> {
    let column = table.column(user).unwrap_or_default();
    match stats(column.into_iter().map(|(_, value)| value)) {
        Some(s) => messages::summary(&s).to_vec(),
        None => vec![messages::NOTHING_LOGGED.to_string()],
    }
}

/// One line per registered user with the direction and relative size of their trend.
pub fn trend_report(table: &UsageTable, window: TrendWindow) -> String {
    if table.users().is_empty() {
        return messages::NO_USERS.to_string();
    }
    let mut lines = Vec::with_capacity(table.users().len() + 1);
    lines.push(match window {
        TrendWindow::AllTime => "Usage trend, all time:".to_string(),
        TrendWindow::LastDays(n) => format!("Usage trend, last {} days:", n),
    });

    let mut any = false;
    for user in table.users() {
        let column = table.column(user).unwrap_or_default();
        match trend(&column, window) {
            Some(t) => {
                any = true;
                let emoji = if t.is_rising() { "📈" } else { "📉" };
                lines.push(format!(
                    "@{} {} {:+.1}% per day ({:+.1} min/day over {} entries)",
                    user,
                    emoji,
                    t.percent_per_day(),
                    t.fit.slope,
                    t.points
                ));
            }
            None => lines.push(format!("@{}: not enough data", user)),
        }
    }
    if !any {
        return messages::NO_TREND_DATA.to_string();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn table() -> UsageTable {
        let mut t = UsageTable::with_users(["anna", "pau"]);
        for (d, anna, pau) in [(1, 60, Some(200)), (2, 90, None), (3, 120, Some(100))] {
            t.ensure_row(date(d));
            t.set(date(d), "anna", Some(Duration::minutes(anna))).unwrap();
            t.set(date(d), "pau", pau.map(Duration::minutes)).unwrap();
        }
        t
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_messages(&table(), "anna");
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "In total you have spent 0 days, 4 hours and 30 minutes looking at your phone."
        );
        assert_eq!(lines[1], "Your record in a single day is 2 hours and 0 minutes.");
        assert_eq!(lines[2], "Your lowest day is 1 hours and 0 minutes.");
        assert_eq!(lines[3], "Your daily mean is 1 hours and 30 minutes.");
    }

    #[test]
    fn test_summary_without_entries() {
        let t = UsageTable::with_users(["anna"]);
        assert_eq!(summary_messages(&t, "anna"), vec![messages::NOTHING_LOGGED.to_string()]);
    }

    #[test]
    fn test_trend_directions() {
        let report = trend_report(&table(), TrendWindow::AllTime);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("@anna 📈 +"), "{}", lines[1]);
        assert!(lines[2].starts_with("@pau 📉 -"), "{}", lines[2]);
    }

    #[test]
    fn test_trend_window_drops_old_points() {
        // Two trailing days: anna keeps days 2 and 3, pau only day 3.
        let report = trend_report(&table(), TrendWindow::LastDays(2));
        assert!(report.contains("@pau: not enough data"), "{}", report);
        assert!(report.contains("@anna 📈"), "{}", report);
        assert!(report.contains("over 2 entries"), "{}", report);
        // A one-day window never has two points.
        assert_eq!(
            trend_report(&table(), TrendWindow::LastDays(1)),
            messages::NO_TREND_DATA
        );
    }

    #[test]
    fn test_trend_without_data() {
        let t = UsageTable::with_users(["anna"]);
        assert_eq!(trend_report(&t, TrendWindow::AllTime), messages::NO_TREND_DATA);
        assert_eq!(
            trend_report(&UsageTable::default(), TrendWindow::AllTime),
            messages::NO_USERS
        );
    }
}
