//! Tests for pagination module

use super::*;
use crate::types::{Cursor, Record};
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: u32,
    name: &'static str,
}

impl Record for Person {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }
}

fn person(id: u32) -> Person {
    Person { id, name: "p" }
}

fn ids(records: &[Person]) -> Vec<u32> {
    records.iter().map(|p| p.id).collect()
}

// ============================================================================
// RecordSet Tests
// ============================================================================

#[test]
fn test_record_set_from_batch_dedups_in_order() {
    let set = RecordSet::from_batch(vec![person(3), person(1), person(3), person(2), person(1)]);
    assert_eq!(ids(set.as_slice()), vec![3, 1, 2]);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_record_set_identity_ignores_other_fields() {
    let mut set = RecordSet::new();
    assert!(set.push(Person { id: 1, name: "Luke" }));
    assert!(!set.push(Person { id: 1, name: "Leia" }));
    assert_eq!(set.as_slice()[0].name, "Luke");
    assert!(set.contains(&1));
    assert!(!set.contains(&2));
}

#[test]
fn test_record_set_extend_unique_counts_appended() {
    let mut set = RecordSet::from_batch(vec![person(1), person(2)]);
    let added = set.extend_unique(vec![person(2), person(3), person(4), person(3)]);
    assert_eq!(added, 2);
    assert_eq!(ids(set.as_slice()), vec![1, 2, 3, 4]);
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_returns_survivors_in_incoming_order() {
    let existing = RecordSet::from_batch(vec![person(1), person(2), person(3)]);
    let result = merge(&existing, vec![person(5), person(3), person(4)]);

    assert_eq!(ids(&result.unique_new), vec![5, 4]);
    assert_eq!(result.diff_count, 2);
    assert!(!result.is_empty());
    // existing is untouched
    assert_eq!(existing.len(), 3);
}

#[test]
fn test_merge_all_duplicates_is_empty() {
    let existing = RecordSet::from_batch(vec![person(1), person(2)]);
    let result = merge(&existing, vec![person(2), person(1)]);
    assert!(result.is_empty());
    assert!(result.unique_new.is_empty());
}

#[test]
fn test_merge_dedups_incoming_against_itself() {
    let existing = RecordSet::from_batch(vec![person(1)]);
    let result = merge(&existing, vec![person(2), person(2), person(1), person(3)]);
    assert_eq!(ids(&result.unique_new), vec![2, 3]);
    assert_eq!(result.diff_count, 2);
}

#[test]
fn test_merge_into_empty() {
    let existing: RecordSet<Person> = RecordSet::new();
    let result = merge(&existing, vec![person(9)]);
    assert_eq!(result.diff_count, 1);
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state: PaginationState<Person> = PaginationState::new();
    assert!(state.records.is_empty());
    assert!(state.next_cursor.is_none());
    assert!(!state.is_fetch_in_progress);
    assert!(state.last_attempted_cursor.is_none());
    assert_eq!(state.consecutive_empty_retries, 0);
    assert!(!state.has_next());
}

#[test]
fn test_pagination_state_fetch_bookkeeping() {
    let mut state: PaginationState<Person> = PaginationState::new();
    state.begin_fetch(Some(Cursor::from("p2")));
    assert!(state.is_fetch_in_progress);
    assert_eq!(state.last_attempted_cursor, Some(Cursor::from("p2")));

    state.end_fetch();
    assert!(!state.is_fetch_in_progress);
    // the attempt is remembered for retry
    assert_eq!(state.last_attempted_cursor, Some(Cursor::from("p2")));
}

#[test]
fn test_pagination_state_replace_records() {
    let mut state = PaginationState::new();
    state.replace_records(vec![person(1), person(2)]);
    state.replace_records(vec![person(7), person(7), person(8)]);
    assert_eq!(ids(state.records.as_slice()), vec![7, 8]);
}

// ============================================================================
// DisplayState Tests
// ============================================================================

#[test_case(DisplayState::Idle, Some(Intent::NextPage) ; "idle loads more")]
#[test_case(DisplayState::Fail, Some(Intent::Retry) ; "fail retries")]
#[test_case(DisplayState::Paginating, None ; "paginating has no action")]
#[test_case(DisplayState::Done, None ; "done has no action")]
fn test_display_state_intent(state: DisplayState, expected: Option<Intent>) {
    assert_eq!(state.intent(), expected);
    assert_eq!(state.config().action_title.is_some(), expected.is_some());
}

#[test]
fn test_display_state_config() {
    assert!(DisplayState::Paginating.config().show_loading);
    assert!(!DisplayState::Idle.config().show_loading);
    assert_eq!(DisplayState::Fail.config().action_title, Some("Retry"));
    assert_eq!(DisplayState::Idle.config().action_title, Some("Load More"));
}

#[test_case(DisplayState::Paginating, "Incoming..." ; "paginating title")]
#[test_case(DisplayState::Idle, "Do you want more?" ; "idle title")]
#[test_case(DisplayState::Done, "Thats all mate." ; "done title")]
#[test_case(DisplayState::Fail, "Error ocurred :(" ; "fail title")]
fn test_display_state_title(state: DisplayState, title: &str) {
    assert_eq!(state.config().title, title);
}

#[test]
fn test_display_state_after_page() {
    assert_eq!(DisplayState::after_page(true), DisplayState::Idle);
    assert_eq!(DisplayState::after_page(false), DisplayState::Done);
}

#[test]
fn test_change_display_state() {
    assert_eq!(
        Change::<Person>::PaginationLoading.display_state(),
        Some(DisplayState::Paginating)
    );
    assert_eq!(
        Change::<Person>::PaginationLoaded {
            state: DisplayState::Done
        }
        .display_state(),
        Some(DisplayState::Done)
    );
    assert_eq!(
        Change::<Person>::PaginationError.display_state(),
        Some(DisplayState::Fail)
    );
    assert_eq!(Change::<Person>::Reloaded.display_state(), None);
    assert_eq!(Change::<Person>::RefreshLoaded.kind(), "refresh_loaded");
}

#[test]
fn test_phase_is_fetching() {
    assert!(!Phase::Idle.is_fetching());
    assert!(Phase::FetchingInitial.is_fetching());
    assert!(Phase::FetchingNext.is_fetching());
    assert!(Phase::FetchingRetry.is_fetching());
}
