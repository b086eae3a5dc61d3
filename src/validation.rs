use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for configuration and command-line input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the dataset path.
    ///
    /// Existence is left to the loader so a missing file is reported as a load
    /// failure with its I/O cause.
    pub fn validate_data_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("Data path cannot be empty"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("Data path contains invalid characters"));
        }

        if path.is_dir() {
            return Err(anyhow!("Data path is a directory: {path:?}"));
        }

        Ok(())
    }

    /// Validate an output directory setting
    pub fn validate_output_directory(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.trim().is_empty() {
            return Err(anyhow!("Output directory cannot be empty"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("Output directory contains invalid characters"));
        }

        if path.exists() && !path.is_dir() {
            return Err(anyhow!("Output path exists and is not a directory: {path:?}"));
        }

        Ok(())
    }

    /// Validate number of ranking rows to print
    pub fn validate_top_n(top_n: usize) -> Result<()> {
        if top_n == 0 {
            return Err(anyhow!("top_n must be greater than 0"));
        }

        if top_n > 10_000 {
            return Err(anyhow!("top_n too large (max 10,000)"));
        }

        Ok(())
    }

    /// Validate chart size in pixels
    pub fn validate_chart_dimensions(width: u32, height: u32) -> Result<()> {
        for (name, value) in [("width", width), ("height", height)] {
            if !(200..=8000).contains(&value) {
                return Err(anyhow!("Chart {name} must be between 200 and 8000 pixels, got {value}"));
            }
        }

        Ok(())
    }

    /// Validate the calendar year used to build dates
    pub fn validate_year(year: i32) -> Result<()> {
        if !(1900..=2100).contains(&year) {
            return Err(anyhow!("Year must be between 1900 and 2100, got {year}"));
        }

        Ok(())
    }
}
