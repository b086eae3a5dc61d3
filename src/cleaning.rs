//! Missing value handling.
//!
//! Text columns are filled with [`UNKNOWN`], numeric columns with zero. This
//! must run before enrichment since the derived ratios read numeric columns.

use crate::models::{PerformanceRecord, RawRecord, SCHEMA, UNKNOWN};
use serde::Serialize;
use tracing::{debug, info};

/// Number of values filled in one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnFill {
    /// Column name
    pub column: &'static str,
    /// Values that were missing and got the fill value
    pub filled: usize,
}

/// Per-column account of what the cleaner changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    /// One entry per required column, in schema order
    pub columns: Vec<ColumnFill>,
}

impl CleaningReport {
    /// Total number of filled values across all columns
    #[must_use]
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }

    /// Filled count for a single column, zero if the column is unknown
    #[must_use]
    pub fn filled(&self, column: &str) -> usize {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map_or(0, |c| c.filled)
    }
}

/// Applies the fill policy to raw rows
#[derive(Debug, Copy, Clone, Default)]
pub struct Cleaner;

impl Cleaner {
    /// Fill every missing value and report what was filled.
    #[must_use]
    pub fn clean(records: Vec<RawRecord>) -> (Vec<PerformanceRecord>, CleaningReport) {
        let report = CleaningReport {
            columns: SCHEMA
                .iter()
                .map(|(name, _)| ColumnFill {
                    column: *name,
                    filled: records.iter().filter(|r| !r.has_value(name)).count(),
                })
                .collect(),
        };

        let cleaned: Vec<PerformanceRecord> = records.into_iter().map(fill_record).collect();

        for fill in report.columns.iter().filter(|c| c.filled > 0) {
            debug!(column = fill.column, filled = fill.filled, "Filled missing values");
        }
        info!(
            rows = cleaned.len(),
            filled = report.total_filled(),
            "Missing values handled"
        );

        (cleaned, report)
    }
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

fn fill_record(raw: RawRecord) -> PerformanceRecord {
    PerformanceRecord {
        month: text(raw.month),
        day: raw.day.unwrap_or(0),
        campaign_number: text(raw.campaign_number),
        banner: text(raw.banner),
        placement: text(raw.placement),
        displays: raw.displays.unwrap_or(0),
        clicks: raw.clicks.unwrap_or(0),
        cost: raw.cost.unwrap_or(0.0),
        revenue: raw.revenue.unwrap_or(0.0),
        post_click_conversions: raw.post_click_conversions.unwrap_or(0),
        post_click_sales_amount: raw.post_click_sales_amount.unwrap_or(0.0),
        user_engagement: text(raw.user_engagement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_text_becomes_unknown() {
        let raw = RawRecord { banner: Some("728x90".into()), ..RawRecord::default() };
        let (cleaned, _) = Cleaner::clean(vec![raw]);
        let row = &cleaned[0];
        assert_eq!(row.banner, "728x90");
        assert_eq!(row.month, UNKNOWN);
        assert_eq!(row.campaign_number, UNKNOWN);
        assert_eq!(row.placement, UNKNOWN);
        assert_eq!(row.user_engagement, UNKNOWN);
    }

    #[test]
    fn test_missing_numbers_become_zero() {
        let raw = RawRecord { cost: Some(3.5), ..RawRecord::default() };
        let (cleaned, _) = Cleaner::clean(vec![raw]);
        let row = &cleaned[0];
        assert_eq!(row.day, 0);
        assert_eq!(row.displays, 0);
        assert_eq!(row.clicks, 0);
        assert!((row.cost - 3.5).abs() < f64::EPSILON);
        assert!(row.revenue.abs() < f64::EPSILON);
        assert_eq!(row.post_click_conversions, 0);
        assert!(row.post_click_sales_amount.abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_counts_fills_per_column() {
        let rows = vec![
            RawRecord { clicks: Some(1), banner: Some("a".into()), ..RawRecord::default() },
            RawRecord { banner: Some("b".into()), ..RawRecord::default() },
        ];
        let (_, report) = Cleaner::clean(rows);
        assert_eq!(report.filled("clicks"), 1);
        assert_eq!(report.filled("banner"), 0);
        assert_eq!(report.filled("cost"), 2);
        assert_eq!(report.total_filled(), 12 * 2 - 3);
    }
}
