//! "Today" in the reference time zone, injectable for tests.

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock read in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Always returns the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The calendar day before today.
pub fn yesterday(clock: &dyn Clock) -> NaiveDate {
    let today = clock.today();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
