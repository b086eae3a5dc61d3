//! Console report.
//!
//! Writes the schema summary, the first rows and every step's tables and
//! metrics to any [`Write`] sink; the binary hands it a locked stdout.

use crate::analysis::{AnalysisResult, Artifact};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{weekday_name, SchemaSummary};
use crate::table::{format_value, Metric, Table};
use std::io::Write;
use std::path::Path;

/// Plain-text report writer
#[derive(Debug)]
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    /// Wrap a writer
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Row count and per-column non-missing counts, before cleaning.
    pub fn write_schema(&mut self, schema: &SchemaSummary) -> Result<()> {
        writeln!(self.out, "Dataset: {} rows, {} columns", schema.rows, schema.columns.len())?;
        writeln!(self.out, " #  {:<26}{:>14}  Type", "Column", "Non-Missing")?;
        for (i, column) in schema.columns.iter().enumerate() {
            writeln!(
                self.out,
                "{i:>2}  {:<26}{:>14}  {}",
                column.name, column.non_missing, column.column_type
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// The first `n` enriched rows.
    pub fn write_head(&mut self, dataset: &Dataset, n: usize) -> Result<()> {
        let mut table = Table::new(
            "head",
            "First rows",
            ["date", "weekday", "campaign_number", "banner", "placement", "user_engagement"],
            ["displays", "clicks", "cost", "revenue", "post_click_conversions", "post_click_sales_amount"],
        );
        for row in dataset.head(n) {
            let r = &row.record;
            table.push(
                vec![
                    row.date.map_or_else(|| "NaT".to_string(), |d| d.format("%Y-%m-%d").to_string()),
                    row.weekday.map_or("NaN", weekday_name).to_string(),
                    r.campaign_number.clone(),
                    r.banner.clone(),
                    r.placement.clone(),
                    r.user_engagement.clone(),
                ],
                vec![
                    Some(r.displays as f64),
                    Some(r.clicks as f64),
                    Some(r.cost),
                    Some(r.revenue),
                    Some(r.post_click_conversions as f64),
                    Some(r.post_click_sales_amount),
                ],
            );
        }
        self.write_table(&table)
    }

    /// Header line for one step.
    pub fn write_step_header(&mut self, result: &AnalysisResult) -> Result<()> {
        writeln!(self.out, "# {}. {}", result.step, result.title)?;
        Ok(())
    }

    /// Print every table and metric of a step; charts are reported separately.
    pub fn write_result(&mut self, result: &AnalysisResult) -> Result<()> {
        for artifact in &result.artifacts {
            match artifact {
                Artifact::Table(table) => self.write_table(table)?,
                Artifact::Metric(metric) => self.write_metric(metric)?,
                Artifact::Chart(_) => {}
            }
        }
        Ok(())
    }

    /// Aligned table with key columns first.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        let headers: Vec<&str> = table
            .key_columns
            .iter()
            .chain(table.value_columns.iter())
            .map(String::as_str)
            .collect();
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                row.keys
                    .iter()
                    .cloned()
                    .chain(row.values.iter().map(|v| format_value(*v)))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let keys = table.key_columns.len();

        let line = |values: &[&str]| -> String {
            values
                .iter()
                .zip(widths.iter().copied())
                .enumerate()
                .map(|(i, (v, w))| if i < keys { format!("{v:<w$}") } else { format!("{v:>w$}") })
                .collect::<Vec<_>>()
                .join("  ")
        };

        writeln!(self.out, "{}", line(&headers).trim_end())?;
        for row in &cells {
            let refs: Vec<&str> = row.iter().map(String::as_str).collect();
            writeln!(self.out, "{}", line(&refs).trim_end())?;
        }
        if table.rows.is_empty() {
            writeln!(self.out, "(no rows)")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// `label: value` with the metric's precision.
    pub fn write_metric(&mut self, metric: &Metric) -> Result<()> {
        match metric.value {
            Some(v) => writeln!(self.out, "{}: {v:.prec$}", metric.label, prec = metric.precision)?,
            None => writeln!(self.out, "{}: NaN", metric.label)?,
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Where a chart was written, or that it was skipped.
    pub fn write_chart_location(&mut self, title: &str, path: Option<&Path>) -> Result<()> {
        match path {
            Some(p) => writeln!(self.out, "[chart] {title} -> {}", p.display())?,
            None => writeln!(self.out, "[chart] {title} (rendering disabled)")?,
        }
        Ok(())
    }
}
