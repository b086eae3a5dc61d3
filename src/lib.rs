//! Ad Performance EDA - exploratory analysis of online advertising data
//!
//! A Rust library for loading a daily advertising performance CSV, filling its
//! gaps, deriving efficiency ratios and answering a fixed list of twenty
//! business questions with tables and charts.
//!
//! # Features
//!
//! - Schema-checked CSV loading with typed rows
//! - Missing-value cleaning with a per-column report
//! - Derived dates, weekdays and ratios where division by zero is undefined
//! - Grouped aggregation, ranking and correlation
//! - Console tables, SVG charts and optional JSON/CSV export

/// Grouping, ordering and ranking helpers
pub mod aggregate;
/// The twenty analysis steps
pub mod analysis;
/// Chart descriptions and the SVG renderer
pub mod chart;
/// Missing-value handling
pub mod cleaning;
/// Configuration management
pub mod config;
/// Read-only enriched table
pub mod dataset;
/// Derived columns
pub mod enrich;
/// Error types
pub mod error;
/// Table export
pub mod file_writer;
/// CSV loading and schema checks
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Console report
pub mod report;
/// End-to-end run
pub mod runner;
/// Numeric helpers
pub mod stats;
/// Tabular results
pub mod table;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use analysis::{Analysis, AnalysisOptions, AnalysisResult};
pub use chart::{ChartRenderer, ChartSpec, SvgRenderer};
pub use dataset::Dataset;
pub use error::{EdaError, Result};
pub use models::{EnrichedRecord, OutputFormat, PerformanceRecord, RawRecord};
pub use runner::{prepare, present, Prepared, RunSettings, RunSummary};
