//! The enriched, read-only table every analysis step borrows.

use crate::models::EnrichedRecord;

/// Enriched rows, immutable once built by the enricher
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
}

impl Dataset {
    pub(crate) const fn new(records: Vec<EnrichedRecord>) -> Self {
        Self { records }
    }

    /// All rows in file order
    #[must_use]
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// First `n` rows
    #[must_use]
    pub fn head(&self, n: usize) -> &[EnrichedRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the rows
    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a EnrichedRecord;
    type IntoIter = std::slice::Iter<'a, EnrichedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
