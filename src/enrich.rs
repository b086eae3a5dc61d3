//! Derived column computation.
//!
//! The [`Enricher`] consumes the cleaned rows and is the only writer of the
//! table; the [`Dataset`] it returns is read-only.

use crate::dataset::Dataset;
use crate::models::{EnrichedRecord, PerformanceRecord};
use crate::stats::safe_ratio;
use chrono::{Datelike, Month, NaiveDate};
use tracing::{info, warn};

/// Year used to build calendar dates when the data only carries month and day
pub const DEFAULT_YEAR: i32 = 2025;

/// Builds the derived columns for every row
#[derive(Debug, Clone, Copy)]
pub struct Enricher {
    year: i32,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl Enricher {
    /// Create an enricher that places all dates in `year`
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    /// Derive every computed column and freeze the table.
    #[must_use]
    pub fn enrich(&self, records: Vec<PerformanceRecord>) -> Dataset {
        let enriched: Vec<EnrichedRecord> =
            records.into_iter().map(|r| self.enrich_record(r)).collect();

        let undated = enriched.iter().filter(|r| r.date.is_none()).count();
        if undated > 0 {
            warn!(rows = undated, "Rows without a valid calendar date");
        }
        info!(rows = enriched.len(), year = self.year, "Derived columns computed");

        Dataset::new(enriched)
    }

    /// Derive the computed columns of a single row.
    #[must_use]
    pub fn enrich_record(&self, record: PerformanceRecord) -> EnrichedRecord {
        let month = parse_month(&record.month);
        let date = month.and_then(|m| NaiveDate::from_ymd_opt(self.year, m, record.day));
        let month_year = month.and_then(|m| NaiveDate::from_ymd_opt(self.year, m, 1));
        let clicks = record.clicks as f64;

        EnrichedRecord {
            date,
            month_year,
            revenue_per_click: safe_ratio(record.revenue, clicks),
            post_click_conversion_rate: safe_ratio(record.post_click_conversions as f64, clicks),
            user_engagement_num: engagement_level(&record.user_engagement),
            cpc: safe_ratio(record.cost, clicks),
            weekday: date.map(|d| d.weekday()),
            record,
        }
    }
}

/// Month number from either `1`..`12` or an English month name.
#[must_use]
pub fn parse_month(label: &str) -> Option<u32> {
    let label = label.trim();
    if let Ok(number) = label.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    label.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Ordinal engagement: Low=1, Medium=2, High=3, anything else undefined.
#[must_use]
pub fn engagement_level(label: &str) -> Option<u8> {
    match label {
        "Low" => Some(1),
        "Medium" => Some(2),
        "High" => Some(3),
        _ => None,
    }
}
