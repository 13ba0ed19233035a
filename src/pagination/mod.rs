//! Pagination module
//!
//! State, deduplication and notification vocabulary shared by the
//! orchestrator and its observers.
//!
//! # Overview
//!
//! - `RecordSet` keeps records unique by id in first-seen order
//! - `PaginationState` holds records plus cursor bookkeeping
//! - `merge` finds the genuinely new part of an incoming batch
//! - `Change` and `DisplayState` describe what observers are told

mod merge;
mod state;
mod types;

pub use merge::{merge, Merge};
pub use state::{PaginationState, RecordSet};
pub use types::{Change, DisplayState, FooterConfig, Intent, Phase};

#[cfg(test)]
mod tests;
