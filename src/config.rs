use crate::enrich::DEFAULT_YEAR;
use crate::models::OutputFormat;
use crate::validation::InputValidator;
use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub charts: ChartConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub enabled: bool,
    pub output_directory: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub export_format: Option<String>, // "json" or "csv"
    pub output_directory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                path: "online_advertising_performance_data.csv".to_string(),
                year: DEFAULT_YEAR,
            },
            analysis: AnalysisConfig { top_n: 5 },
            charts: ChartConfig {
                enabled: true,
                output_directory: "./charts".to_string(),
                width: 1200,
                height: 500,
            },
            report: ReportConfig {
                export_format: None,
                output_directory: "./report".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

/// Values given on the command line; each one that is set wins over every
/// configuration source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_path: Option<String>,
    pub top_n: Option<usize>,
    pub chart_directory: Option<String>,
    pub disable_charts: bool,
    pub export_format: Option<OutputFormat>,
    pub report_directory: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.data_path {
            config.data.path.clone_from(path);
        }
        if let Some(top_n) = self.top_n {
            config.analysis.top_n = top_n;
        }
        if let Some(dir) = &self.chart_directory {
            config.charts.output_directory.clone_from(dir);
        }
        if self.disable_charts {
            config.charts.enabled = false;
        }
        if let Some(format) = self.export_format {
            config.report.export_format = Some(format.extension().to_string());
        }
        if let Some(dir) = &self.report_directory {
            config.report.output_directory.clone_from(dir);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        Self::load_with_file(None)
    }

    /// Load configuration, layering an explicit config file over the defaults
    /// and optional `config/*` files; environment variables win over both.
    pub fn load_with_file(path: Option<&Path>) -> Result<Self> {
        Self::resolve(path, &ConfigOverrides::default())
    }

    /// Load every layer, apply command-line overrides last, then validate the
    /// merged result once.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut app_config = Self::load_layers(path)?;
        overrides.apply(&mut app_config);
        app_config.validate()?;
        Ok(app_config)
    }

    /// Merge defaults, config files and environment variables without
    /// validating; a layer may hold a value a later one replaces.
    pub fn load_layers(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let mut builder = Config::builder()
            // Start with default values
            .add_source(defaults)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Add environment variables with prefix, e.g. AD_EDA__ANALYSIS__TOP_N=10
            .add_source(
                Environment::with_prefix("AD_EDA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        InputValidator::validate_data_path(Path::new(&self.data.path))?;
        InputValidator::validate_year(self.data.year)?;
        InputValidator::validate_top_n(self.analysis.top_n)?;
        InputValidator::validate_chart_dimensions(self.charts.width, self.charts.height)?;
        InputValidator::validate_output_directory(Path::new(&self.charts.output_directory))?;
        InputValidator::validate_output_directory(Path::new(&self.report.output_directory))?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate export config
        self.export_format()?;

        Ok(())
    }

    /// Parsed export format, `None` when export is off
    pub fn export_format(&self) -> Result<Option<OutputFormat>> {
        self.report
            .export_format
            .as_deref()
            .map(|f| f.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e)))
            .transpose()
    }

    /// Input CSV path
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data.path)
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
