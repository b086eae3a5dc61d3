//! Error types for the ad-performance-eda library.
//!
//! This module provides custom error types using `thiserror` so the loader,
//! renderers and exporters can report specific failures; the binary wraps
//! them with `anyhow` context.

use thiserror::Error;

/// Errors that can occur while loading, analysing or presenting the dataset.
#[derive(Error, Debug)]
pub enum EdaError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns absent from the header row
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A data row whose values do not match the declared schema
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Underlying parse failure
        message: String,
    },

    /// Header present but no data rows
    #[error("Dataset contains no rows")]
    EmptyDataset,

    /// Chart rendering failures
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `EdaError`
pub type Result<T> = std::result::Result<T, EdaError>;
