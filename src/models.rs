//! Data models for advertising performance records
//!
//! A record moves through three shapes: [`RawRecord`] as read from disk (every
//! value may be missing), [`PerformanceRecord`] after the fill policy has run,
//! and [`EnrichedRecord`] once the derived columns are attached.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written into text columns whose value is missing
pub const UNKNOWN: &str = "Unknown";

/// Declared value type of a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    /// Free text or category label
    Text,
    /// Non-negative whole number
    Integer,
    /// Floating point amount
    Float,
}

impl ColumnType {
    /// Returns true for the numeric types that are filled with zero
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

/// Required columns and their declared types, in file order
pub const SCHEMA: [(&str, ColumnType); 12] = [
    ("month", ColumnType::Text),
    ("day", ColumnType::Integer),
    ("campaign_number", ColumnType::Text),
    ("banner", ColumnType::Text),
    ("placement", ColumnType::Text),
    ("displays", ColumnType::Integer),
    ("clicks", ColumnType::Integer),
    ("cost", ColumnType::Float),
    ("revenue", ColumnType::Float),
    ("post_click_conversions", ColumnType::Integer),
    ("post_click_sales_amount", ColumnType::Float),
    ("user_engagement", ColumnType::Text),
];

/// A row exactly as read from the CSV file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    /// Month number (1-12) or month name
    pub month: Option<String>,
    /// Day of month
    pub day: Option<u32>,
    /// Campaign identifier
    pub campaign_number: Option<String>,
    /// Banner size category
    pub banner: Option<String>,
    /// Site or page location category
    pub placement: Option<String>,
    /// Number of ad displays
    pub displays: Option<u64>,
    /// Number of clicks
    pub clicks: Option<u64>,
    /// Spend
    pub cost: Option<f64>,
    /// Revenue attributed to the row
    pub revenue: Option<f64>,
    /// Conversions after a click
    pub post_click_conversions: Option<u64>,
    /// Sales amount after a click
    pub post_click_sales_amount: Option<f64>,
    /// Engagement label (Low / Medium / High)
    pub user_engagement: Option<String>,
}

impl RawRecord {
    /// Whether the named column holds a value in this row
    #[must_use]
    pub fn has_value(&self, column: &str) -> bool {
        match column {
            "month" => self.month.is_some(),
            "day" => self.day.is_some(),
            "campaign_number" => self.campaign_number.is_some(),
            "banner" => self.banner.is_some(),
            "placement" => self.placement.is_some(),
            "displays" => self.displays.is_some(),
            "clicks" => self.clicks.is_some(),
            "cost" => self.cost.is_some(),
            "revenue" => self.revenue.is_some(),
            "post_click_conversions" => self.post_click_conversions.is_some(),
            "post_click_sales_amount" => self.post_click_sales_amount.is_some(),
            "user_engagement" => self.user_engagement.is_some(),
            _ => false,
        }
    }
}

/// A row with every missing value filled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    /// Month number (1-12) or month name
    pub month: String,
    /// Day of month
    pub day: u32,
    /// Campaign identifier
    pub campaign_number: String,
    /// Banner size category
    pub banner: String,
    /// Site or page location category
    pub placement: String,
    /// Number of ad displays
    pub displays: u64,
    /// Number of clicks
    pub clicks: u64,
    /// Spend
    pub cost: f64,
    /// Revenue attributed to the row
    pub revenue: f64,
    /// Conversions after a click
    pub post_click_conversions: u64,
    /// Sales amount after a click
    pub post_click_sales_amount: f64,
    /// Engagement label (Low / Medium / High)
    pub user_engagement: String,
}

/// A cleaned row plus its derived columns; `None` marks an undefined value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// The cleaned source row
    pub record: PerformanceRecord,
    /// Calendar date built from month and day
    pub date: Option<NaiveDate>,
    /// First day of the record's month
    pub month_year: Option<NaiveDate>,
    /// Day of week of `date`
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Option<Weekday>,
    /// revenue / clicks
    pub revenue_per_click: Option<f64>,
    /// `post_click_conversions` / clicks
    pub post_click_conversion_rate: Option<f64>,
    /// Ordinal engagement level (Low=1, Medium=2, High=3)
    pub user_engagement_num: Option<u8>,
    /// Cost per click
    pub cpc: Option<f64>,
}

fn serialize_weekday<S: serde::Serializer>(
    weekday: &Option<Weekday>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match weekday {
        Some(day) => serializer.serialize_some(weekday_name(*day)),
        None => serializer.serialize_none(),
    }
}

/// Days of the week in reporting order
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Summary line for one column, the equivalent of a dataframe `info()` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    /// Column name
    pub name: &'static str,
    /// Declared type
    pub column_type: ColumnType,
    /// Rows where the column holds a value
    pub non_missing: usize,
}

/// Shape of the dataset as loaded, before any cleaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    /// Number of data rows
    pub rows: usize,
    /// One entry per required column
    pub columns: Vec<ColumnSummary>,
}

/// Output format for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported export format: {other}")),
        }
    }
}
