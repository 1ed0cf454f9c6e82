//! Rolling-average chart rendered to a PNG with plotters.
//!
//! Text needs a TrueType font registered with plotters' `ab_glyph` backend. The font is read
//! once from the configured path or a list of common system locations; without one the chart
//! is drawn without caption, axis labels and legend.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use storage::UsageTable;
use thiserror::Error;
use tracing::{debug, warn};
use usage_stats::{rolling_minutes, ROLLING_WINDOW};

/// Daily screen-time goal drawn as a horizontal line, in minutes.
pub const REFERENCE_MINUTES: f64 = 120.0;

const SIZE: (u32, u32) = (1024, 640);

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No usage data to plot")]
    NoData,

    #[error("Chart drawing failed: {0}")]
    Draw(String),

    #[error("Chart task failed: {0}")]
    Task(String),
}

fn draw_err<E: Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Renders charts to a fixed output path.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    path: PathBuf,
    font_path: Option<PathBuf>,
}

impl ChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            font_path: None,
        }
    }

    /// Uses the TrueType font at `font_path` for chart text.
    pub fn with_font(mut self, font_path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(font_path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One line per user of the 7-row rolling mean in minutes, plus the reference line.
    /// Returns the path of the written PNG.
    pub fn render_rolling_average(&self, table: &UsageTable) -> Result<&Path, ChartError> {
        let (first, last) = match (table.dates().first(), table.latest_date()) {
            (Some(first), Some(last)) if !table.users().is_empty() => (*first, last),
            _ => return Err(ChartError::NoData),
        };

        let series: Vec<(String, Vec<Vec<(f64, f64)>>)> = table
            .users()
            .iter()
            .map(|user| {
                let column = table.column(user).unwrap_or_default();
                let points: Vec<(f64, Option<f64>)> = rolling_minutes(&column, ROLLING_WINDOW)
                    .into_iter()
                    .map(|(date, value)| (day_offset(first, date), value))
                    .collect();
                (user.clone(), segments(&points))
            })
            .collect();

        let span = day_offset(first, last).max(1.0);
        let top = series
            .iter()
            .flat_map(|(_, segs)| segs.iter().flatten().map(|(_, y)| *y))
            .fold(REFERENCE_MINUTES, f64::max)
            * 1.1;

        let with_text = self.font_ready();
        debug!(path = %self.path.display(), with_text, "Rendering rolling average chart");

        let root = BitMapBackend::new(&self.path, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if with_text {
            builder
                .caption(crate::messages::CHART_CAPTION, ("sans-serif", 24))
                .x_label_area_size(40)
                .y_label_area_size(50);
        }
        let mut chart = builder
            .build_cartesian_2d(0.0..span, 0.0..top)
            .map_err(draw_err)?;

        if with_text {
            let label = |x: &f64| {
                (first + chrono::Duration::days(x.round() as i64))
                    .format("%d/%m")
                    .to_string()
            };
            chart
                .configure_mesh()
                .x_label_formatter(&label)
                .y_desc("minutes")
                .draw()
                .map_err(draw_err)?;
        }

        for (index, (user, segs)) in series.iter().enumerate() {
            let color = Palette99::pick(index).to_rgba();
            for (n, seg) in segs.iter().enumerate() {
                let drawn = chart
                    .draw_series(LineSeries::new(seg.iter().copied(), color.stroke_width(2)))
                    .map_err(draw_err)?;
                if n == 0 {
                    drawn.label(user.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
            }
        }

        chart
            .draw_series(LineSeries::new(
                vec![(0.0, REFERENCE_MINUTES), (span, REFERENCE_MINUTES)],
                RED.stroke_width(1),
            ))
            .map_err(draw_err)?
            .label("goal")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(1)));

        if with_text {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(&self.path)
    }

    fn font_ready(&self) -> bool {
        *FONT_READY.get_or_init(|| {
            let candidates = self
                .font_path
                .iter()
                .cloned()
                .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
            for candidate in candidates {
                let Ok(bytes) = std::fs::read(&candidate) else {
                    continue;
                };
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                match register_font("sans-serif", FontStyle::Normal, bytes) {
                    Ok(()) => {
                        debug!(font = %candidate.display(), "Chart font registered");
                        return true;
                    }
                    Err(_) => warn!(font = %candidate.display(), "Not a usable font"),
                }
            }
            warn!("No font found, charts are drawn without text");
            false
        })
    }
}

fn day_offset(first: NaiveDate, date: NaiveDate) -> f64 {
    (date - first).num_days() as f64
}

/// Splits a series at undefined values so gaps are not bridged.
fn segments(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match y {
            Some(y) => current.push((*x, *y)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_split_on_gaps() {
        let points = [
            (0.0, None),
            (1.0, Some(10.0)),
            (2.0, Some(20.0)),
            (3.0, None),
            (4.0, Some(5.0)),
        ];
        assert_eq!(
            segments(&points),
            vec![vec![(1.0, 10.0), (2.0, 20.0)], vec![(4.0, 5.0)]]
        );
        assert!(segments(&[(0.0, None)]).is_empty());
    }

    #[test]
    fn test_empty_table_has_no_chart() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path().join("chart.png"));
        assert!(matches!(
            renderer.render_rolling_average(&UsageTable::with_users(["anna"])),
            Err(ChartError::NoData)
        ));
        assert!(!dir.path().join("chart.png").exists());
    }
}
