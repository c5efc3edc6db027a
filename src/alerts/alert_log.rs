//! Append-only alert log
//!
//! Records are kept in arrival order. Nothing here removes, reorders or
//! deduplicates entries once appended.

use super::types::AlertRecord;
use serde::Serialize;

/// Insertion-ordered sequence of alert records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AlertLog {
    records: Vec<AlertRecord>,
}

impl AlertLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end of the log
    pub fn append(&mut self, record: AlertRecord) {
        self.records.push(record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record
    pub fn last(&self) -> Option<&AlertRecord> {
        self.records.last()
    }

    /// Iterate in arrival order
    pub fn iter(&self) -> std::slice::Iter<'_, AlertRecord> {
        self.records.iter()
    }

    /// Borrow all records in arrival order
    pub fn as_slice(&self) -> &[AlertRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a AlertLog {
    type Item = &'a AlertRecord;
    type IntoIter = std::slice::Iter<'a, AlertRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
