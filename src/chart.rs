//! Chart descriptions and rendering.
//!
//! Analysis steps only build [`ChartSpec`] values; drawing happens behind the
//! [`ChartRenderer`] trait so aggregation can be tested without a backend.
//! [`SvgRenderer`] draws with `plotters` into one SVG file per chart.

use crate::error::{EdaError, Result};
use crate::stats::BoxStats;
use plotters::prelude::*;
use serde::Serialize;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One named line of a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend label
    pub name: String,
    /// One value per category; undefined points are skipped
    pub values: Vec<Option<f64>>,
}

/// The data a chart shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartKind {
    /// Ordered categories (usually dates) with one or more lines
    Line {
        /// X axis labels in drawing order
        categories: Vec<String>,
        /// Lines to draw
        series: Vec<Series>,
    },
    /// One bar per category
    Bar {
        /// X axis labels in drawing order
        categories: Vec<String>,
        /// Bar heights; undefined bars are left empty
        values: Vec<Option<f64>>,
    },
    /// Distribution of a metric per category
    Box {
        /// One box per category, in drawing order
        boxes: Vec<BoxStats>,
    },
    /// Raw (x, y) observations
    Scatter {
        /// Points with both coordinates defined
        points: Vec<(f64, f64)>,
    },
}

/// A chart to render: title, axis labels and data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// File-name friendly identifier
    pub slug: String,
    /// Caption drawn above the plot
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Chart data
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Create a chart description
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        kind: ChartKind,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            kind,
        }
    }
}

/// Something that can turn a [`ChartSpec`] into an image
pub trait ChartRenderer {
    /// Render the chart for analysis step `step` and return where it went.
    fn render(&mut self, step: u8, chart: &ChartSpec) -> Result<PathBuf>;
}

/// Renders charts to SVG files with `plotters`
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

impl SvgRenderer {
    /// Create a renderer writing `width` x `height` SVGs into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self { output_dir: output_dir.into(), width, height }
    }

    /// Directory the charts are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File path used for a chart of a given step
    #[must_use]
    pub fn chart_path(&self, step: u8, chart: &ChartSpec) -> PathBuf {
        self.output_dir.join(format!("{step:02}_{}.svg", chart.slug))
    }

    fn draw(&self, path: &Path, chart: &ChartSpec) -> DrawResult {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        match &chart.kind {
            ChartKind::Line { categories, series } => draw_line(&root, chart, categories, series)?,
            ChartKind::Bar { categories, values } => draw_bar(&root, chart, categories, values)?,
            ChartKind::Box { boxes } => draw_box(&root, chart, boxes)?,
            ChartKind::Scatter { points } => draw_scatter(&root, chart, points)?,
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&mut self, step: u8, chart: &ChartSpec) -> Result<PathBuf> {
        create_dir_all(&self.output_dir)?;
        let path = self.chart_path(step, chart);
        self.draw(&path, chart)
            .map_err(|e| EdaError::Chart(format!("{}: {e}", chart.title)))?;
        debug!(path = %path.display(), title = %chart.title, "Chart rendered");
        Ok(path)
    }
}

/// Padded (min, max) of the given values, with a fallback for empty input.
fn value_range<I: IntoIterator<Item = f64>>(values: I, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (if include_zero && lo >= 0.0 { lo } else { lo - pad }, hi + pad)
}

/// Axis label for a category position, blank between categories.
fn category_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

fn category_axis(count: usize) -> std::ops::Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

fn draw_line(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    chart: &ChartSpec,
    categories: &[String],
    series: &[Series],
) -> DrawResult {
    let (y_min, y_max) = value_range(series.iter().flat_map(|s| s.values.iter().flatten().copied()), true);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(categories.len()), y_min..y_max)?;

    let formatter = |x: &f64| category_label(categories, *x);
    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(categories.len().clamp(2, 12))
        .x_label_formatter(&formatter)
        .draw()?;

    for (idx, line) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = line
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect();
        ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(line.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_bar(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    chart: &ChartSpec,
    categories: &[String],
    values: &[Option<f64>],
) -> DrawResult {
    let (y_min, y_max) = value_range(values.iter().flatten().copied(), true);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(categories.len()), y_min..y_max)?;

    let formatter = |x: &f64| category_label(categories, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(categories.len().max(2))
        .x_label_formatter(&formatter)
        .draw()?;

    ctx.draw_series(values.iter().enumerate().filter_map(|(i, v)| {
        let x = i as f64;
        v.map(|v| Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], BLUE.mix(0.7).filled()))
    }))?;
    Ok(())
}

fn draw_box(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    chart: &ChartSpec,
    boxes: &[BoxStats],
) -> DrawResult {
    let (y_min, y_max) = value_range(
        boxes.iter().flat_map(|b| {
            b.outliers
                .iter()
                .copied()
                .chain([b.lower_whisker, b.upper_whisker])
        }),
        false,
    );
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(category_axis(boxes.len()), y_min..y_max)?;

    let formatter = |x: &f64| category_label(&labels, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(boxes.len().max(2))
        .x_label_formatter(&formatter)
        .draw()?;

    for (i, stats) in boxes.iter().enumerate() {
        let x = i as f64;
        let color = Palette99::pick(i).to_rgba();
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, stats.q1), (x + 0.3, stats.q3)],
            color.mix(0.4).filled(),
        )))?;
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, stats.q1), (x + 0.3, stats.q3)],
            BLACK.stroke_width(1),
        )))?;
        ctx.draw_series([
            PathElement::new(vec![(x - 0.3, stats.median), (x + 0.3, stats.median)], BLACK.stroke_width(2)),
            PathElement::new(vec![(x, stats.q3), (x, stats.upper_whisker)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, stats.q1), (x, stats.lower_whisker)], BLACK.stroke_width(1)),
            PathElement::new(
                vec![(x - 0.15, stats.upper_whisker), (x + 0.15, stats.upper_whisker)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(x - 0.15, stats.lower_whisker), (x + 0.15, stats.lower_whisker)],
                BLACK.stroke_width(1),
            ),
        ])?;
        ctx.draw_series(
            stats
                .outliers
                .iter()
                .map(|v| Circle::new((x, *v), 3, BLACK.stroke_width(1))),
        )?;
    }
    Ok(())
}

fn draw_scatter(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    chart: &ChartSpec,
    points: &[(f64, f64)],
) -> DrawResult {
    let (x_min, x_max) = value_range(points.iter().map(|p| p.0), false);
    let (y_min, y_max) = value_range(points.iter().map(|p| p.1), false);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    ctx.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.mix(0.5).filled())),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_chart() -> ChartSpec {
        ChartSpec::new(
            "weekday-engagement",
            "User Engagement on Weekdays vs Weekends",
            "Weekday",
            "User Engagement Count",
            ChartKind::Bar {
                categories: vec!["Monday".into(), "Tuesday".into()],
                values: vec![Some(3.0), None],
            },
        )
    }

    #[test]
    fn test_value_range_padding_and_fallback() {
        assert_eq!(value_range(std::iter::empty(), true), (0.0, 1.0));
        assert_eq!(value_range([2.0, 2.0], false), (1.0, 3.0));
        let (lo, hi) = value_range([1.0, 11.0], true);
        assert!(lo.abs() < f64::EPSILON);
        assert!(hi > 11.0);
    }

    #[test]
    fn test_category_label_only_on_integers() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }

    #[test]
    fn test_chart_path_uses_step_and_slug() {
        let renderer = SvgRenderer::new("charts", 800, 600);
        let path = renderer.chart_path(16, &bar_chart());
        assert_eq!(path, Path::new("charts").join("16_weekday-engagement.svg"));
    }

    #[test]
    fn test_svg_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = SvgRenderer::new(dir.path().join("charts"), 640, 480);
        let path = renderer.render(16, &bar_chart()).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"));
    }
}
