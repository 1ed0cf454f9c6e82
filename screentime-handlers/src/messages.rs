//! Reply texts.

use usage_stats::{DurationParts, UsageStats};

pub const HELP: &str = "\
/register - start tracking your screen time
/yesterday hh mm - log yesterday's usage (alias /y)
/summary - your totals, record, minimum and daily mean
/reminder - who has logged yesterday and who has not
/trendline [days] - usage trend per user, optionally over the last days
/rolling_avg - 7-day rolling average chart";

pub const NOT_REGISTERED: &str = "You are not registered yet. Write /register to do so.";
pub const YESTERDAY_USAGE: &str = "Malformed command. Write: /yesterday hh mm (hours minutes)";
pub const TRENDLINE_USAGE: &str = "Malformed command. Write: /trendline [days], days being a positive number";
pub const NOTHING_LOGGED: &str = "You have not logged any usage yet. Try /yesterday hh mm.";
pub const NO_USERS: &str = "There are no registered users yet. Write /register to be the first.";
pub const NOBODY_LOGGED: &str = "Nobody has logged yesterday's usage yet.";
pub const EVERYBODY_LOGGED: &str = "Everybody has logged yesterday's usage.";
pub const NO_TREND_DATA: &str = "There is not enough data to compute any trend yet.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I did not understand that command. Write /help to see what I can do.";
pub const STORAGE_UNAVAILABLE: &str = "The usage sheet is not reachable right now. Please try again later.";
pub const CHECK_SHEET: &str = "Something is off with the stored usage data. Please check the sheet manually.";
pub const CHART_FAILED: &str = "Sorry, I could not draw the chart this time.";
pub const CHART_CAPTION: &str = "7-day rolling average (minutes)";

pub fn greeting(name: &str) -> String {
    format!("Hi {}! I keep track of your daily screen time. Commands:\n{}", name, HELP)
}

pub fn welcome(name: &str) -> String {
    format!("Hi {}, welcome! Your screen time is now tracked.", name)
}

pub fn already_registered(name: &str) -> String {
    format!("{}, you are already registered.", name)
}

pub fn logged(hours: u32, minutes: u32) -> String {
    format!(
        "Noted: yesterday you spent {} hours and {} minutes on your phone.",
        hours, minutes
    )
}

pub fn single_pending(name: &str) -> String {
    format!("Everybody has logged yesterday's usage except {}. Hurry up!", name)
}

pub fn partial(done: &[String], pending: &[String]) -> String {
    format!(
        "{} already logged, still missing {}.",
        done.join(", "),
        pending.join(", ")
    )
}

/// The four summary lines: total, record, minimum, daily mean.
pub fn summary(stats: &UsageStats) -> [String; 4] {
    let total = DurationParts::from(stats.total);
    let max = DurationParts::from(stats.max);
    let min = DurationParts::from(stats.min);
    let mean = DurationParts::from(stats.mean);
    [
        format!(
            "In total you have spent {} days, {} hours and {} minutes looking at your phone.",
            total.days, total.hours, total.minutes
        ),
        format!(
            "Your record in a single day is {} hours and {} minutes.",
            max.whole_hours(),
            max.minutes
        ),
        format!(
            "Your lowest day is {} hours and {} minutes.",
            min.whole_hours(),
            min.minutes
        ),
        format!(
            "Your daily mean is {} hours and {} minutes.",
            mean.whole_hours(),
            mean.minutes
        ),
    ]
}
