use metrics::{counter, gauge, histogram};
use std::time::Duration;
use tracing::info;

const ROWS_LOADED: &str = "ad_eda_rows_loaded_total";
const VALUES_FILLED: &str = "ad_eda_values_filled_total";
const PHASE_DURATION: &str = "ad_eda_phase_duration_seconds";
const STEP_DURATION: &str = "ad_eda_step_duration_seconds";
const STEPS_COMPLETED: &str = "ad_eda_steps_completed_total";
const CHARTS_RENDERED: &str = "ad_eda_charts_rendered_total";
const TABLES_EMITTED: &str = "ad_eda_tables_emitted_total";
const FILES_EXPORTED: &str = "ad_eda_files_exported_total";
const ERRORS: &str = "ad_eda_errors_total";
const DATASET_ROWS: &str = "ad_eda_dataset_rows";

/// Run metrics: local tallies, mirrored to the `metrics` facade
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricsCollector {
    /// Rows read from the CSV
    pub rows_loaded: u64,
    /// Missing values replaced by the cleaner
    pub values_filled: u64,
    /// Analysis steps finished
    pub steps_completed: u64,
    /// Charts written by the renderer
    pub charts_rendered: u64,
    /// Tables printed to the report
    pub tables_emitted: u64,
    /// Files written by the exporter
    pub files_exported: u64,
    /// Failures of any kind
    pub errors_total: u64,
}

impl MetricsCollector {
    /// Record a completed load
    pub fn record_load(&mut self, rows: usize, duration: Duration) {
        self.rows_loaded += rows as u64;
        counter!(ROWS_LOADED).increment(rows as u64);
        gauge!(DATASET_ROWS).set(rows as f64);
        histogram!(PHASE_DURATION, "phase" => "load").record(duration.as_secs_f64());
    }

    /// Record the cleaner's fills
    pub fn record_cleaning(&mut self, filled: usize) {
        self.values_filled += filled as u64;
        counter!(VALUES_FILLED).increment(filled as u64);
    }

    /// Record the duration of a named phase
    pub fn record_phase(&mut self, phase: &'static str, duration: Duration) {
        histogram!(PHASE_DURATION, "phase" => phase).record(duration.as_secs_f64());
    }

    /// Record one finished analysis step
    pub fn record_step(&mut self, step: &'static str, duration: Duration) {
        self.steps_completed += 1;
        counter!(STEPS_COMPLETED).increment(1);
        histogram!(STEP_DURATION, "step" => step).record(duration.as_secs_f64());
    }

    /// Record a rendered chart
    pub fn record_chart(&mut self) {
        self.charts_rendered += 1;
        counter!(CHARTS_RENDERED).increment(1);
    }

    /// Record a printed table
    pub fn record_table(&mut self) {
        self.tables_emitted += 1;
        counter!(TABLES_EMITTED).increment(1);
    }

    /// Record exported files
    pub fn record_export(&mut self, files: usize) {
        self.files_exported += files as u64;
        counter!(FILES_EXPORTED).increment(files as u64);
    }

    /// Record error metrics
    pub fn record_error(&mut self, error_type: &'static str) {
        self.errors_total += 1;
        counter!(ERRORS, "type" => error_type).increment(1);
    }

    /// Log the tallies
    pub fn log_summary(&self) {
        info!(
            rows_loaded = self.rows_loaded,
            values_filled = self.values_filled,
            steps_completed = self.steps_completed,
            charts_rendered = self.charts_rendered,
            tables_emitted = self.tables_emitted,
            files_exported = self.files_exported,
            errors = self.errors_total,
            "Run summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.steps_completed, 0);
        assert_eq!(collector.errors_total, 0);
    }

    #[test]
    fn test_step_and_chart_tallies() {
        let mut collector = MetricsCollector::default();
        collector.record_step("campaign-roi", Duration::from_millis(3));
        collector.record_step("sales-trend", Duration::from_millis(1));
        collector.record_chart();
        assert_eq!(collector.steps_completed, 2);
        assert_eq!(collector.charts_rendered, 1);
    }
}
