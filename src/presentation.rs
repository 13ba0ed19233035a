//! Rendering-side list model
//!
//! Mirrors the orchestrator's records for a list view: full redraw on
//! `Reloaded`, tail insertion on `Paginated`.

use crate::pagination::{Change, PaginationState};
use crate::types::Record;
use std::ops::Range;

/// What a list view has to redraw after a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Nothing changed
    None,
    /// Redraw everything
    Full,
    /// Insert rows at these indices
    Appended(Range<usize>),
}

/// Ordered records as displayed
#[derive(Debug, Clone)]
pub struct Presentation<R> {
    records: Vec<R>,
}

impl<R> Default for Presentation<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Presentation<R> {
    /// Create an empty presentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with the state's records
    pub fn refresh(&mut self, state: &PaginationState<R>) {
        self.records = state.records.to_vec();
    }

    /// Append newly paginated records
    pub fn append(&mut self, new_records: &[R]) -> Range<usize> {
        let start = self.records.len();
        self.records.extend_from_slice(new_records);
        start..self.records.len()
    }

    /// Apply a notification
    pub fn apply(&mut self, change: &Change<R>, state: &PaginationState<R>) -> Update {
        match change {
            Change::Reloaded => {
                self.refresh(state);
                Update::Full
            }
            Change::Paginated { records, .. } => Update::Appended(self.append(records)),
            _ => Update::None,
        }
    }

    /// Displayed records
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
