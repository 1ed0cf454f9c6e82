use chrono::Duration;

/// Full-history reduction over a user's logged days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStats {
    pub total: Duration,
    pub max: Duration,
    pub min: Duration,
    /// `total / count`: averaged over logged days, not the calendar span.
    pub mean: Duration,
    pub count: usize,
}

/// Sum, max, min and mean over the present entries. `None` when nothing was logged.
///
/// The total saturates at `Duration::MAX` instead of overflowing.
pub fn stats<I>(series: I) -> Option<UsageStats>
where
    I: IntoIterator<Item = Option<Duration>>,
{
    let mut present = series.into_iter().flatten();
    let first = present.next()?;
    let (total, max, min, count) = present.fold((first, first, first, 1usize), |acc, d| {
        let total = acc.0.checked_add(&d).unwrap_or(Duration::MAX);
        (total, acc.1.max(d), acc.2.min(d), acc.3 + 1)
    });

    Some(UsageStats {
        total,
        max,
        min,
        mean: total / count as i32,
        count,
    })
}
