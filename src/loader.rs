//! CSV loading with an explicit schema.
//!
//! The header row is checked against [`SCHEMA`] before any data row is read, and
//! each row is deserialized into a typed [`RawRecord`]. A value that does not
//! parse as its declared type aborts the load with the offending row number.

use crate::error::{EdaError, Result};
use crate::models::{ColumnSummary, RawRecord, SchemaSummary, SCHEMA};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Rows read from disk together with their schema summary
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Typed rows, missing values still `None`
    pub records: Vec<RawRecord>,
    /// Column-level summary computed before cleaning
    pub schema: SchemaSummary,
}

/// CSV file loader for performance records.
#[derive(Debug, Copy, Clone)]
pub struct CsvLoader;

impl CsvLoader {
    /// Load records from a CSV file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// The parsed records and their schema summary, or the first error met.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedData> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening dataset");
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load records from any reader producing CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<LoadedData> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        check_headers(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
            let record = result.map_err(|e| EdaError::InvalidRecord {
                row: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(EdaError::EmptyDataset);
        }

        let schema = summarize(&records);
        info!(rows = schema.rows, columns = headers.len(), "Dataset loaded");
        Ok(LoadedData { records, schema })
    }
}

fn check_headers(headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = SCHEMA
        .iter()
        .filter(|(name, _)| !headers.iter().any(|h| h == *name))
        .map(|(name, _)| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EdaError::MissingColumns(missing))
    }
}

/// Count non-missing values per required column.
#[must_use]
pub fn summarize(records: &[RawRecord]) -> SchemaSummary {
    let columns = SCHEMA
        .iter()
        .map(|(name, column_type)| ColumnSummary {
            name: *name,
            column_type: *column_type,
            non_missing: records.iter().filter(|r| r.has_value(name)).count(),
        })
        .collect();

    SchemaSummary { rows: records.len(), columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "month,day,campaign_number,banner,placement,displays,clicks,cost,revenue,post_click_conversions,post_click_sales_amount,user_engagement";

    #[test]
    fn test_file_not_found() {
        let result = CsvLoader::load("nonexistent.csv");
        assert!(matches!(result, Err(EdaError::Io(_))));
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let data = "month,day,banner\n1,1,300x250\n";
        match CsvLoader::from_reader(data.as_bytes()) {
            Err(EdaError::MissingColumns(cols)) => {
                assert!(cols.contains(&"clicks".to_string()));
                assert!(cols.contains(&"user_engagement".to_string()));
                assert!(!cols.contains(&"banner".to_string()));
                assert_eq!(cols.len(), 9);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_names_row() {
        let data = format!(
            "{HEADER}\n1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n1,2,1,300x250,Top,100,many,5.0,20.0,2,50.0,High\n"
        );
        match CsvLoader::from_reader(data.as_bytes()) {
            Err(EdaError::InvalidRecord { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let data = format!("{HEADER}\nApril, 3 ,,300x250,,100,,5.5,,2,50.0,\n");
        let loaded = CsvLoader::from_reader(data.as_bytes()).unwrap();
        let row = &loaded.records[0];
        assert_eq!(row.month.as_deref(), Some("April"));
        assert_eq!(row.day, Some(3));
        assert_eq!(row.campaign_number, None);
        assert_eq!(row.placement, None);
        assert_eq!(row.clicks, None);
        assert_eq!(row.revenue, None);
        assert_eq!(row.user_engagement, None);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let data = format!("{HEADER},notes\n1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High,ignored\n");
        let loaded = CsvLoader::from_reader(data.as_bytes()).unwrap();
        assert_eq!(loaded.records.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let data = format!("{HEADER}\n");
        assert!(matches!(
            CsvLoader::from_reader(data.as_bytes()),
            Err(EdaError::EmptyDataset)
        ));
    }

    #[test]
    fn test_schema_summary_counts_non_missing() {
        let data = format!(
            "{HEADER}\n1,1,1,300x250,Top,100,10,5.0,20.0,2,50.0,High\n1,2,1,300x250,Top,100,,5.0,20.0,2,50.0,\n"
        );
        let loaded = CsvLoader::from_reader(data.as_bytes()).unwrap();
        assert_eq!(loaded.schema.rows, 2);
        let clicks = loaded.schema.columns.iter().find(|c| c.name == "clicks").unwrap();
        assert_eq!(clicks.non_missing, 1);
        let month = loaded.schema.columns.iter().find(|c| c.name == "month").unwrap();
        assert_eq!(month.non_missing, 2);
    }
}
