use chrono::{Duration, NaiveDate};

use crate::duration_parts::minutes;

/// Rows per rolling window (one row per day).
pub const ROLLING_WINDOW: usize = 7;

/// Trailing rolling mean over `window` rows.
///
/// Position `i` is defined once the window is complete (`i + 1 >= window`) and holds at least one
/// present value; absent values count neither toward the sum nor the divisor.
pub fn rolling_mean(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; series.len()];
    }
    (0..series.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let (sum, count) = series[i + 1 - window..=i]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}

/// Rolling mean in minutes of a dated duration series, keeping the dates.
pub fn rolling_minutes(
    series: &[(NaiveDate, Option<Duration>)],
    window: usize,
) -> Vec<(NaiveDate, Option<f64>)> {
    let values: Vec<Option<f64>> = series.iter().map(|(_, d)| d.map(minutes)).collect();
    series
        .iter()
        .map(|(date, _)| *date)
        .zip(rolling_mean(&values, window))
        .collect()
}
