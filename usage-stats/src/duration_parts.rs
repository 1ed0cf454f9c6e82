use chrono::Duration;

/// Days / hours / minutes breakdown of a duration (seconds are dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub days: i64,
    /// 0..24
    pub hours: i64,
    /// 0..60
    pub minutes: i64,
}

impl DurationParts {
    /// Hours including whole days, for values that may exceed a day.
    pub fn whole_hours(&self) -> i64 {
        self.days * 24 + self.hours
    }
}

impl From<Duration> for DurationParts {
    fn from(duration: Duration) -> Self {
        let total_minutes = duration.num_minutes().max(0);
        Self {
            days: total_minutes / (24 * 60),
            hours: (total_minutes / 60) % 24,
            minutes: total_minutes % 60,
        }
    }
}

/// Duration as fractional minutes.
pub fn minutes(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 60.0
}
