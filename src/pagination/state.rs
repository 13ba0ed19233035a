//! Pagination state
//!
//! The ordered, id-unique record collection and the cursor bookkeeping the
//! orchestrator mutates.

use crate::types::{Cursor, Record};
use std::collections::HashSet;

/// Ordered sequence of records, unique by id, in first-seen order
#[derive(Debug, Clone)]
pub struct RecordSet<R: Record> {
    records: Vec<R>,
    ids: HashSet<R::Id>,
}

impl<R: Record> Default for RecordSet<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
        }
    }
}

impl<R: Record> RecordSet<R> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a batch, dropping later duplicates within the batch
    pub fn from_batch(batch: impl IntoIterator<Item = R>) -> Self {
        let mut set = Self::new();
        set.extend_unique(batch);
        set
    }

    /// Append a record unless its id is already present
    ///
    /// Returns whether the record was appended.
    pub fn push(&mut self, record: R) -> bool {
        if self.ids.contains(record.id()) {
            return false;
        }
        self.ids.insert(record.id().clone());
        self.records.push(record);
        true
    }

    /// Append every record whose id is new, returning how many were appended
    pub fn extend_unique(&mut self, batch: impl IntoIterator<Item = R>) -> usize {
        let mut added = 0;
        for record in batch {
            if self.push(record) {
                added += 1;
            }
        }
        added
    }

    /// Whether a record with this id is present
    pub fn contains(&self, id: &R::Id) -> bool {
        self.ids.contains(id)
    }

    /// Records in order
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of the records in order
    pub fn to_vec(&self) -> Vec<R> {
        self.records.clone()
    }
}

impl<'a, R: Record> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Mutable store owned by one orchestrator
#[derive(Debug, Clone)]
pub struct PaginationState<R: Record> {
    /// Records in display order
    pub records: RecordSet<R>,
    /// Cursor of the next page, `None` when no further pages are known
    pub next_cursor: Option<Cursor>,
    /// Set between the start of a fetch and the receipt of its completion
    pub is_fetch_in_progress: bool,
    /// Cursor used by the most recent attempt
    pub last_attempted_cursor: Option<Cursor>,
    /// Consecutive auto-chained fetches caused by empty responses
    pub consecutive_empty_retries: u32,
}

impl<R: Record> Default for PaginationState<R> {
    fn default() -> Self {
        Self {
            records: RecordSet::new(),
            next_cursor: None,
            is_fetch_in_progress: false,
            last_attempted_cursor: None,
            consecutive_empty_retries: 0,
        }
    }
}

impl<R: Record> PaginationState<R> {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether another page is known to exist
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Mark a fetch as started with `cursor`
    pub fn begin_fetch(&mut self, cursor: Option<Cursor>) {
        self.is_fetch_in_progress = true;
        self.last_attempted_cursor = cursor;
    }

    /// Mark the in-flight fetch as finished
    pub fn end_fetch(&mut self) {
        self.is_fetch_in_progress = false;
    }

    /// Replace all records with a fresh first page
    pub fn replace_records(&mut self, batch: Vec<R>) {
        self.records = RecordSet::from_batch(batch);
    }
}
