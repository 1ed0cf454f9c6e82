//! # usage-stats
//!
//! Pure functions over one user's duration series (a column of the usage table):
//! [`stats`], [`rolling_mean`], [`linear_fit`] and [`trend`]. Absent entries (`None`) are
//! days the user did not log; they never count as zero.

mod duration_parts;
mod rolling;
mod summary;
mod trend;

pub use duration_parts::{minutes, DurationParts};
pub use rolling::{rolling_mean, rolling_minutes, ROLLING_WINDOW};
pub use summary::{stats, UsageStats};
pub use trend::{linear_fit, trend, trend_points, Trend, TrendFit, TrendWindow};
