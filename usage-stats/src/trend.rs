use chrono::{Duration, NaiveDate};

use crate::duration_parts::minutes;

/// Which part of a user's history a trend is fitted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendWindow {
    #[default]
    AllTime,
    /// The trailing `n` days, counted back from the user's own latest entry.
    LastDays(u32),
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
}

/// A fitted trend for one user, in minutes per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub fit: TrendFit,
    pub mean_minutes: f64,
    pub points: usize,
}

impl Trend {
    /// Daily change as a percentage of the user's mean usage in the window.
    pub fn percent_per_day(&self) -> f64 {
        if self.mean_minutes == 0.0 {
            0.0
        } else {
            self.fit.slope / self.mean_minutes * 100.0
        }
    }

    pub fn is_rising(&self) -> bool {
        self.fit.slope > 0.0
    }
}

/// OLS fit. `None` with fewer than two points or when every x is the same.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<TrendFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(TrendFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Points `(day offset, minutes)` for a trend fit.
///
/// Absent entries are dropped. Offsets are relative to this series' own latest present entry
/// (so it sits at 0 and earlier days are negative), independently of other users' series.
/// `LastDays(n)` keeps the trailing `n` days including the latest, offsets in `-n+1..=0`.
pub fn trend_points(series: &[(NaiveDate, Option<Duration>)], window: TrendWindow) -> Vec<(f64, f64)> {
    let present: Vec<(NaiveDate, Duration)> = series
        .iter()
        .filter_map(|(date, d)| d.map(|d| (*date, d)))
        .collect();
    let Some(latest) = present.iter().map(|(date, _)| *date).max() else {
        return Vec::new();
    };

    present
        .into_iter()
        .map(|(date, d)| ((date - latest).num_days(), d))
        .filter(|(offset, _)| match window {
            TrendWindow::AllTime => true,
            TrendWindow::LastDays(n) => *offset > -i64::from(n),
        })
        .map(|(offset, d)| (offset as f64, minutes(d)))
        .collect()
}

/// Trend of one user's series over `window`. `None` when fewer than two days qualify.
pub fn trend(series: &[(NaiveDate, Option<Duration>)], window: TrendWindow) -> Option<Trend> {
    let points = trend_points(series, window);
    let fit = linear_fit(&points)?;
    let mean_minutes = points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64;
    Some(Trend {
        fit,
        mean_minutes,
        points: points.len(),
    })
}
