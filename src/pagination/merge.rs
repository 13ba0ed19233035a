//! Dedup merger
//!
//! Computes which records of an incoming batch are genuinely new.

use super::state::RecordSet;
use crate::types::Record;
use std::collections::HashSet;

/// Outcome of merging a batch against existing records
#[derive(Debug, Clone, PartialEq)]
pub struct Merge<R> {
    /// Incoming records not already present, in incoming order
    pub unique_new: Vec<R>,
    /// Number of survivors
    pub diff_count: usize,
}

impl<R> Merge<R> {
    /// Whether the batch carried no new information
    pub fn is_empty(&self) -> bool {
        self.diff_count == 0
    }
}

/// Subtract `existing` ids from `incoming`
///
/// Survivors keep their relative order. Ids repeated inside `incoming` survive
/// once, at their first position. Pure: `existing` is not modified.
pub fn merge<R: Record>(existing: &RecordSet<R>, incoming: Vec<R>) -> Merge<R> {
    let mut seen: HashSet<R::Id> = HashSet::new();
    let unique_new: Vec<R> = incoming
        .into_iter()
        .filter(|record| !existing.contains(record.id()) && seen.insert(record.id().clone()))
        .collect();

    Merge {
        diff_count: unique_new.len(),
        unique_new,
    }
}
