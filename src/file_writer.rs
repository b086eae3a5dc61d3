//! Table export.
//!
//! Writes every table of every analysis step to its own file, either as a
//! pretty-printed JSON object or as CSV with a header row.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::models::OutputFormat;
use crate::table::Table;
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write every table of `results` into `output_dir`.
///
/// Files are named `<step>_<table slug>.<ext>`.
///
/// # Returns
///
/// Vector of paths to created files
pub fn export_tables(results: &[AnalysisResult], format: OutputFormat, output_dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for result in results {
        for table in result.tables() {
            let path = output_dir.join(format!("{:02}_{}.{}", result.step, table.slug, format.extension()));
            write_table_to_file(table, format, &path)?;
            debug!(path = %path.display(), rows = table.rows.len(), "Table exported");
            written.push(path);
        }
    }
    Ok(written)
}

/// Write a single table to a file in the specified format.
pub fn write_table_to_file(table: &Table, format: OutputFormat, file_path: &Path) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv_file(table, file_path),
        OutputFormat::Json => write_json_file(table, file_path),
    }
}

/// Key columns then value columns; undefined values are left empty.
fn write_csv_file(table: &Table, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(table.key_columns.iter().chain(table.value_columns.iter()))?;
    for row in &table.rows {
        let values = row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(row.keys.iter().cloned().chain(values))?;
    }

    writer.flush()?;
    Ok(())
}

/// The whole table as a JSON object; undefined values become `null`.
fn write_json_file(table: &Table, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roi_table() -> Table {
        let mut table = Table::new("campaign-roi", "Campaigns by ROI", ["campaign_number"], ["revenue", "cost", "ROI"]);
        table.push(vec!["camp 1".into()], vec![Some(20.0), Some(5.0), Some(4.0)]);
        table.push(vec!["camp 2".into()], vec![Some(1.0), Some(0.0), None]);
        table
    }

    #[test]
    fn test_csv_leaves_undefined_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roi.csv");
        write_table_to_file(&roi_table(), OutputFormat::Csv, &path).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["campaign_number,revenue,cost,ROI", "camp 1,20,5,4", "camp 2,1,0,"]);
    }

    #[test]
    fn test_json_uses_null_for_undefined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roi.json");
        write_table_to_file(&roi_table(), OutputFormat::Json, &path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["slug"], "campaign-roi");
        assert!(value["rows"][1]["values"][2].is_null());
        assert_eq!(value["rows"][0]["values"][2], 4.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_errors_surface_for_both_formats() {
        let full = Path::new("/dev/full");
        assert!(write_table_to_file(&roi_table(), OutputFormat::Json, full).is_err());
        assert!(write_table_to_file(&roi_table(), OutputFormat::Csv, full).is_err());
    }
}
