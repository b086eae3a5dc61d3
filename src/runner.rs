//! End-to-end run: load, clean, enrich, then every analysis step.
//!
//! [`prepare`] is the single writer of the table; once it returns, the
//! [`Dataset`] is only borrowed. [`present`] computes each step and hands its
//! artifacts to the console report, the chart renderer and the exporter.

use crate::analysis::{Analysis, AnalysisOptions, AnalysisResult};
use crate::chart::ChartRenderer;
use crate::cleaning::{Cleaner, CleaningReport};
use crate::dataset::Dataset;
use crate::enrich::Enricher;
use crate::error::{EdaError, Result};
use crate::file_writer::export_tables;
use crate::loader::{CsvLoader, LoadedData};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{OutputFormat, SchemaSummary};
use crate::report::ConsoleReport;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Rows shown before the analyses
pub const HEAD_ROWS: usize = 5;

/// The loaded, cleaned and enriched table plus what happened on the way
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Column summary taken before cleaning
    pub schema: SchemaSummary,
    /// Values filled by the cleaner
    pub cleaning: CleaningReport,
    /// Read-only enriched rows
    pub dataset: Dataset,
}

/// Where exported tables go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// File format
    pub format: OutputFormat,
    /// Target directory
    pub directory: PathBuf,
}

/// Options for presenting a run
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// Options passed to every analysis step
    pub analysis: AnalysisOptions,
    /// Table export, off when `None`
    pub export: Option<ExportSettings>,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Results of every step, in report order
    pub results: Vec<AnalysisResult>,
    /// Rendered chart files
    pub charts: Vec<PathBuf>,
    /// Exported table files
    pub exported: Vec<PathBuf>,
}

/// Load the CSV at `path`, clean it and derive the computed columns.
pub fn prepare(path: &Path, year: i32, metrics: &mut MetricsCollector) -> Result<Prepared> {
    let timer = OperationTimer::new("load");
    let loaded = CsvLoader::load(path);
    finish_prepare(loaded, timer, year, metrics)
}

/// Same as [`prepare`] for CSV text from any reader.
pub fn prepare_from_reader<R: Read>(reader: R, year: i32, metrics: &mut MetricsCollector) -> Result<Prepared> {
    let timer = OperationTimer::new("load");
    let loaded = CsvLoader::from_reader(reader);
    finish_prepare(loaded, timer, year, metrics)
}

fn finish_prepare(
    loaded: Result<LoadedData>,
    timer: OperationTimer,
    year: i32,
    metrics: &mut MetricsCollector,
) -> Result<Prepared> {
    let LoadedData { records, schema } = loaded.inspect_err(|_| metrics.record_error("load"))?;
    metrics.record_load(schema.rows, timer.finish());

    let timer = OperationTimer::new("clean");
    let (cleaned, cleaning) = Cleaner::clean(records);
    metrics.record_cleaning(cleaning.total_filled());
    metrics.record_phase("clean", timer.finish());

    let timer = OperationTimer::new("enrich");
    let dataset = Enricher::new(year).enrich(cleaned);
    metrics.record_phase("enrich", timer.finish());

    Ok(Prepared { schema, cleaning, dataset })
}

/// Run every analysis step over the prepared table and present the results.
///
/// Charts go to `renderer` when one is given; otherwise the report notes that
/// rendering is disabled.
pub fn present<W: Write>(
    prepared: &Prepared,
    settings: &RunSettings,
    report: &mut ConsoleReport<W>,
    mut renderer: Option<&mut dyn ChartRenderer>,
    metrics: &mut MetricsCollector,
) -> Result<RunSummary> {
    if settings.analysis.top_n == 0 {
        return Err(EdaError::InvalidConfig("top_n must be at least 1".to_string()));
    }

    report.write_schema(&prepared.schema)?;
    report.write_head(&prepared.dataset, HEAD_ROWS)?;

    let mut results = Vec::with_capacity(Analysis::ALL.len());
    let mut charts = Vec::new();

    for analysis in Analysis::ALL {
        let timer = OperationTimer::new(analysis.id());
        let result = analysis.run(&prepared.dataset, &settings.analysis);

        report.write_step_header(&result)?;
        report.write_result(&result)?;
        for _ in result.tables() {
            metrics.record_table();
        }

        for chart in result.charts() {
            let location = match renderer.as_deref_mut() {
                Some(r) => {
                    let path = r.render(result.step, chart).inspect_err(|e| {
                        error!(step = result.step, error = %e, "Chart rendering failed");
                        metrics.record_error("chart");
                    })?;
                    metrics.record_chart();
                    Some(path)
                }
                None => None,
            };
            report.write_chart_location(&chart.title, location.as_deref())?;
            charts.extend(location);
        }

        metrics.record_step(analysis.id(), timer.finish());
        results.push(result);
    }

    let exported = match &settings.export {
        Some(export) => {
            let files = export_tables(&results, export.format, &export.directory)
                .inspect_err(|_| metrics.record_error("export"))?;
            metrics.record_export(files.len());
            info!(files = files.len(), directory = %export.directory.display(), "Tables exported");
            files
        }
        None => Vec::new(),
    };

    Ok(RunSummary { results, charts, exported })
}
