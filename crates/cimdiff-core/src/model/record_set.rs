use std::collections::BTreeMap;

use super::record::Record;
use crate::errors::{DiffError, Result};

/// RecordSet - one snapshot of records keyed by id
///
/// Iteration is in ascending id order. The diff generator inherits this
/// order for entries within each group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: BTreeMap<String, Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a sequence of records
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecordId` if two records share an id.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut set = Self::new();
        for record in records {
            if set.records.contains_key(&record.id) {
                return Err(DiffError::DuplicateRecordId {
                    record_id: record.id,
                });
            }
            set.records.insert(record.id.clone(), record);
        }
        Ok(set)
    }

    /// Insert or overwrite the record at its id, returning the previous one
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id.clone(), record)
    }

    pub fn remove(&mut self, id: &str) -> Option<Record> {
        self.records.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records.into_values().collect()
    }
}

impl FromIterator<Record> for RecordSet {
    /// Collect records, later duplicates overwriting earlier ones
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}
