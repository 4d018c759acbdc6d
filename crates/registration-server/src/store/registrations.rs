//! In-memory registration list.

use crate::record::Registration;
use serde::{Deserialize, Serialize};

/// Ordered registrations. Insertion order is the only ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registrations {
    records: Vec<Registration>,
}

impl Registrations {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Add a record at the end.
    pub fn append(&mut self, record: Registration) {
        self.records.push(record);
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Registration] {
        &self.records
    }

    pub fn to_vec(&self) -> Vec<Registration> {
        self.records.clone()
    }
}

impl From<Vec<Registration>> for Registrations {
    fn from(records: Vec<Registration>) -> Self {
        Self { records }
    }
}
