use ad_performance_eda::chart::{ChartRenderer, SvgRenderer};
use ad_performance_eda::config::{AppConfig, ConfigOverrides};
use ad_performance_eda::logging::init_logging;
use ad_performance_eda::metrics::MetricsCollector;
use ad_performance_eda::models::OutputFormat;
use ad_performance_eda::report::ConsoleReport;
use ad_performance_eda::runner::{self, ExportSettings, RunSettings};
use ad_performance_eda::AnalysisOptions;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the advertising performance CSV
    #[arg(short, long)]
    data: Option<String>,

    /// Rows kept in ranking tables
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Directory for rendered SVG charts
    #[arg(long)]
    chart_dir: Option<String>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Export every result table (json or csv)
    #[arg(short, long)]
    export: Option<OutputFormat>,

    /// Directory for exported tables
    #[arg(long)]
    report_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_path: self.data.clone(),
            top_n: self.top_n,
            chart_directory: self.chart_dir.clone(),
            disable_charts: self.no_charts,
            export_format: self.export,
            report_directory: self.report_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::resolve(cli.config.as_deref(), &cli.overrides())?;

    // Initialize logging
    let log_file = config.logging.file_path.as_deref().map(Path::new);
    let _guard = init_logging(&config.get_log_level(), log_file, config.logging.format == "json")?;

    info!("Starting ad-performance-eda");

    let mut metrics = MetricsCollector::default();
    let data_path = config.data_path();

    let prepared = match runner::prepare(&data_path, config.data.year, &mut metrics) {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("Failed to load data: {e}");
            std::process::exit(1);
        }
    };

    info!(
        rows = prepared.dataset.len(),
        filled = prepared.cleaning.total_filled(),
        path = %data_path.display(),
        "Dataset ready"
    );

    let settings = RunSettings {
        analysis: AnalysisOptions { top_n: config.analysis.top_n },
        export: config.export_format()?.map(|format| ExportSettings {
            format,
            directory: PathBuf::from(&config.report.output_directory),
        }),
    };

    let mut renderer = config.charts.enabled.then(|| {
        SvgRenderer::new(&config.charts.output_directory, config.charts.width, config.charts.height)
    });

    let stdout = io::stdout();
    let mut report = ConsoleReport::new(io::BufWriter::new(stdout.lock()));
    let summary = runner::present(
        &prepared,
        &settings,
        &mut report,
        renderer.as_mut().map(|r| r as &mut dyn ChartRenderer),
        &mut metrics,
    )
    .context("Analysis run failed")?;
    report.into_inner().flush()?;

    metrics.log_summary();
    info!(
        steps = summary.results.len(),
        charts = summary.charts.len(),
        exported = summary.exported.len(),
        "Analysis complete"
    );

    Ok(())
}
