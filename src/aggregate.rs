//! Group-by, ranking and reindexing over the enriched rows.
//!
//! Groups come back keyed in ascending order. Rankings are stable and always
//! push undefined metrics to the end, whatever the direction.

use crate::models::{EnrichedRecord, WEEKDAY_ORDER};
use chrono::Weekday;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Rows of one group, borrowed from the dataset
pub type Group<'a> = Vec<&'a EnrichedRecord>;

/// Group rows by a key; rows whose key is `None` are dropped.
pub fn group_by_defined<'a, I, K, F>(records: I, key: F) -> BTreeMap<K, Group<'a>>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
    K: Ord,
    F: Fn(&EnrichedRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Group<'a>> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
}

/// Group rows by a key present on every row.
pub fn group_by<'a, I, K, F>(records: I, key: F) -> BTreeMap<K, Group<'a>>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
    K: Ord,
    F: Fn(&EnrichedRecord) -> K,
{
    group_by_defined(records, |r| Some(key(r)))
}

/// Distinct keys in order of first appearance.
pub fn appearance_order<'a, I, K, F>(records: I, key: F) -> Vec<K>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
    K: PartialEq,
    F: Fn(&EnrichedRecord) -> K,
{
    let mut seen: Vec<K> = Vec::new();
    for record in records {
        let k = key(record);
        if !seen.contains(&k) {
            seen.push(k);
        }
    }
    seen
}

/// Category order for a chart axis.
///
/// Weekday names run Monday to Sunday, numeric labels sort by value, and any
/// other labels keep their order of first appearance.
#[must_use]
pub fn categorical_order(mut labels: Vec<String>) -> Vec<String> {
    let weekdays: Option<Vec<u32>> = labels
        .iter()
        .map(|l| l.trim().parse::<Weekday>().ok().map(|d| d.num_days_from_monday()))
        .collect();
    if let Some(days) = weekdays {
        return sorted_by_key(labels, days, |a, b| a.cmp(b));
    }

    let numeric: Option<Vec<f64>> = labels.iter().map(|l| numeric_label(l)).collect();
    if let Some(values) = numeric {
        labels = sorted_by_key(labels, values, f64::total_cmp);
    }
    labels
}

/// Plain decimal text such as `3`, `-1.5` or `10.0`; no exponents, `inf` or `NaN`.
fn numeric_label(label: &str) -> Option<f64> {
    let label = label.trim();
    let digits = label.strip_prefix(['-', '+']).unwrap_or(label);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    label.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn sorted_by_key<K, F>(labels: Vec<String>, keys: Vec<K>, cmp: F) -> Vec<String>
where
    F: Fn(&K, &K) -> Ordering,
{
    let mut paired: Vec<(K, String)> = keys.into_iter().zip(labels).collect();
    paired.sort_by(|a, b| cmp(&a.0, &b.0));
    paired.into_iter().map(|(_, l)| l).collect()
}

/// Sort direction for a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Compare two optional metrics, undefined last in either direction.
#[must_use]
pub fn compare_metric(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.total_cmp(&y),
            SortDirection::Descending => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by a metric, then keep the first `limit` rows.
pub fn rank_by<T, F>(mut rows: Vec<T>, metric: F, direction: SortDirection, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> Option<f64>,
{
    rows.sort_by(|a, b| compare_metric(metric(a), metric(b), direction));
    rows.truncate(limit);
    rows
}

/// Key used to group rows by weekday; Monday is 0.
#[must_use]
pub fn weekday_key(record: &EnrichedRecord) -> Option<u32> {
    record.weekday.map(|d| d.num_days_from_monday())
}

/// Lay weekday aggregates out Monday to Sunday; absent days are undefined.
#[must_use]
pub fn reindex_weekdays(values: &BTreeMap<u32, Option<f64>>) -> Vec<(Weekday, Option<f64>)> {
    WEEKDAY_ORDER
        .iter()
        .map(|day| (*day, values.get(&day.num_days_from_monday()).copied().flatten()))
        .collect()
}
