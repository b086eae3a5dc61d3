//! Printable aggregate tables and scalar metrics.

use serde::Serialize;

/// One row of an aggregate table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Group key, one entry per key column
    pub keys: Vec<String>,
    /// Aggregates, one entry per value column; `None` is undefined
    pub values: Vec<Option<f64>>,
}

/// A grouped aggregate ready to print or export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// File-name friendly identifier
    pub slug: String,
    /// Heading printed above the table
    pub title: String,
    /// Names of the grouping columns
    pub key_columns: Vec<String>,
    /// Names of the aggregate columns
    pub value_columns: Vec<String>,
    /// Rows in display order
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<K, V>(slug: &str, title: &str, key_columns: K, value_columns: V) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            value_columns: value_columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push(&mut self, keys: Vec<String>, values: Vec<Option<f64>>) {
        debug_assert_eq!(keys.len(), self.key_columns.len());
        debug_assert_eq!(values.len(), self.value_columns.len());
        self.rows.push(TableRow { keys, values });
    }

    /// Value at the row with `keys` in column `column`.
    ///
    /// Outer `None` means no such row or column; inner `None` is an undefined value.
    #[must_use]
    pub fn value(&self, keys: &[&str], column: &str) -> Option<Option<f64>> {
        let col = self.value_columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map(|r| r.values[col])
    }

    /// First key of every row, in order
    #[must_use]
    pub fn first_keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.keys.first().map(String::as_str))
            .collect()
    }
}

/// A single labelled number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    /// What the number is
    pub label: String,
    /// The number, or `None` when undefined
    pub value: Option<f64>,
    /// Decimal places to print
    pub precision: usize,
}

/// Render a table cell: whole numbers without decimals, undefined as `NaN`.
#[must_use]
pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => "NaN".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => format!("{v:.6}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
    }
}
