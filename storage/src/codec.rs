//! Cell text codecs shared by every backend.
//!
//! Durations are stored as `HH:MM:SS` (hours unbounded). Reading also accepts `H:MM`, a
//! fractional seconds part and a leading `N days` prefix. Dates are stored as `YYYY-MM-DD`.

use chrono::{Duration, NaiveDate};

/// Label of the date column in the sheet header row.
pub const DATE_HEADER: &str = "Dia";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a duration cell. Empty or unparseable text is `None` (not yet logged).
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (days, clock) = match text.split_once("day") {
        Some((days, rest)) => {
            let days = digits(days.trim())?;
            let rest = rest.strip_prefix('s').unwrap_or(rest);
            (days, rest.trim().trim_start_matches(',').trim())
        }
        None => (0, text),
    };
    if clock.is_empty() {
        return Duration::try_days(days);
    }

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (digits(h)?, digits(m)?, whole_seconds(s)?),
        [h, m] => (digits(h)?, digits(m)?, 0),
        _ => return None,
    };
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    // Out-of-range fields read as unparseable rather than overflowing.
    Duration::try_days(days)?
        .checked_add(&Duration::try_hours(hours)?)?
        .checked_add(&Duration::try_minutes(minutes)?)?
        .checked_add(&Duration::try_seconds(seconds)?)
}

/// Formats a duration as `HH:MM:SS`; hours are not wrapped at 24.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Parses a date cell: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (time ignored)
/// or `DD/MM/YYYY`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    if text.len() > 10 && text.is_char_boundary(10) {
        let (day, rest) = text.split_at(10);
        if rest.starts_with(' ') || rest.starts_with('T') {
            if let Ok(date) = NaiveDate::parse_from_str(day, DATE_FORMAT) {
                return Some(date);
            }
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Converts 1-based (row, column) coordinates to A1 notation, e.g. (3, 2) → `B3`, (1, 27) → `AA1`.
pub fn a1_notation(row: usize, column: usize) -> String {
    let mut letters = Vec::new();
    let mut col = column;
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", letters.into_iter().collect::<String>(), row)
}

fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn whole_seconds(s: &str) -> Option<i64> {
    match s.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b.is_ascii_digit()) => digits(whole),
        Some(_) => None,
        None => digits(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: i64, m: i64) -> Duration {
        Duration::hours(h) + Duration::minutes(m)
    }

    #[test]
    fn test_parse_duration_clock_forms() {
        assert_eq!(parse_duration("07:30:00"), Some(hm(7, 30)));
        assert_eq!(parse_duration("7:30:00"), Some(hm(7, 30)));
        assert_eq!(parse_duration("7:30"), Some(hm(7, 30)));
        assert_eq!(parse_duration(" 00:05:00 "), Some(hm(0, 5)));
        assert_eq!(parse_duration("30:00:00"), Some(hm(30, 0)));
        assert_eq!(parse_duration("01:00:30.000000"), Some(hm(1, 0) + Duration::seconds(30)));
    }

    #[test]
    fn test_parse_duration_with_days_prefix() {
        assert_eq!(parse_duration("0 days 07:30:00"), Some(hm(7, 30)));
        assert_eq!(parse_duration("1 day, 02:00:00"), Some(hm(26, 0)));
        assert_eq!(parse_duration("2 days"), Some(Duration::days(2)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("NaT"), None);
        assert_eq!(parse_duration("7h30"), None);
        assert_eq!(parse_duration("07:75:00"), None);
        assert_eq!(parse_duration("-1:00:00"), None);
        assert_eq!(parse_duration("+1:00:00"), None);
    }

    #[test]
    fn test_parse_duration_out_of_range_is_none() {
        assert_eq!(parse_duration("9999999999999999:00:00"), None);
        assert_eq!(parse_duration("999999999999999 days"), None);
        assert_eq!(parse_duration("999999999999999 days, 01:00:00"), None);
    }

    #[test]
    fn test_format_duration_pads_and_keeps_long_hours() {
        assert_eq!(format_duration(hm(7, 30)), "07:30:00");
        assert_eq!(format_duration(hm(0, 0)), "00:00:00");
        assert_eq!(format_duration(hm(26, 5) + Duration::seconds(9)), "26:05:09");
    }

    #[test]
    fn test_parse_date_forms() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_date("2024-05-01"), Some(d));
        assert_eq!(parse_date("2024-05-01 00:00:00"), Some(d));
        assert_eq!(parse_date("2024-05-01T00:00:00"), Some(d));
        assert_eq!(parse_date("01/05/2024"), Some(d));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(format_date(d), "2024-05-01");
    }

    #[test]
    fn test_a1_notation() {
        assert_eq!(a1_notation(1, 1), "A1");
        assert_eq!(a1_notation(3, 2), "B3");
        assert_eq!(a1_notation(1, 26), "Z1");
        assert_eq!(a1_notation(1, 27), "AA1");
        assert_eq!(a1_notation(10, 53), "BA10");
    }
}
