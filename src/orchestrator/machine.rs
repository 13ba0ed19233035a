//! Fetch orchestration state machine
//!
//! Decides, on every command and every fetch completion, what observers are
//! told and which fetch (if any) has to run next. It performs no I/O: the
//! caller executes the returned [`FetchRequest`] and feeds the outcome back
//! through [`Orchestrator::complete`]. Auto-chained fetches come back as
//! another request instead of recursing, so a driver simply loops.

use super::observer::Observer;
use crate::config::OrchestratorConfig;
use crate::error::{Result, RELOAD_FAILED_MESSAGE};
use crate::pagination::{merge, Change, DisplayState, PaginationState, Phase};
use crate::types::{Cursor, Page, Record};
use tracing::{debug, warn};

/// A fetch the driver must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Cursor to fetch, `None` for the first page
    pub cursor: Option<Cursor>,
    /// Why the fetch was started
    pub phase: Phase,
}

impl FetchRequest {
    /// Whether this fetches the first page
    pub fn is_initial(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Read-only copy of the orchestrator's state
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    /// Records in display order
    pub records: Vec<R>,
    /// Next page cursor
    pub next_cursor: Option<Cursor>,
    /// Footer state
    pub display_state: DisplayState,
    /// Current phase
    pub phase: Phase,
    /// Current empty-response retry count
    pub consecutive_empty_retries: u32,
}

/// The pagination state machine
pub struct Orchestrator<R: Record> {
    state: PaginationState<R>,
    observer: Box<dyn Observer<R>>,
    retry_threshold: u32,
    /// Pages of only known records skipped in the current cycle
    duplicate_skips: u32,
    phase: Phase,
    display: DisplayState,
}

impl<R: Record> Orchestrator<R> {
    /// Create an orchestrator with default configuration
    pub fn new(observer: impl Observer<R> + 'static) -> Self {
        Self::with_config(&OrchestratorConfig::default(), observer)
    }

    /// Create an orchestrator with explicit configuration
    pub fn with_config(config: &OrchestratorConfig, observer: impl Observer<R> + 'static) -> Self {
        Self {
            state: PaginationState::new(),
            observer: Box::new(observer),
            retry_threshold: config.retry_threshold,
            duplicate_skips: 0,
            phase: Phase::Idle,
            display: DisplayState::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> &PaginationState<R> {
        &self.state
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current footer state
    pub fn display_state(&self) -> DisplayState {
        self.display
    }

    /// Whether a fetch is in flight
    pub fn is_fetch_in_progress(&self) -> bool {
        self.state.is_fetch_in_progress
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> Snapshot<R> {
        Snapshot {
            records: self.state.records.to_vec(),
            next_cursor: self.state.next_cursor.clone(),
            display_state: self.display,
            phase: self.phase,
            consecutive_empty_retries: self.state.consecutive_empty_retries,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Start over from the first page
    pub fn reload(&mut self) -> Option<FetchRequest> {
        self.start_cycle();
        self.begin(None, Phase::FetchingInitial)
    }

    /// Fetch the page after the last one; no-op without a next cursor
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        let cursor = self.state.next_cursor.clone()?;
        self.start_cycle();
        self.begin(Some(cursor), Phase::FetchingNext)
    }

    /// Repeat the most recent attempt
    pub fn retry(&mut self) -> Option<FetchRequest> {
        let cursor = self.state.last_attempted_cursor.clone();
        self.start_cycle();
        self.begin(cursor, Phase::FetchingRetry)
    }

    fn start_cycle(&mut self) {
        // An ack for an in-flight fetch does not open a new cycle.
        if !self.state.is_fetch_in_progress {
            self.duplicate_skips = 0;
        }
    }

    fn begin(&mut self, cursor: Option<Cursor>, phase: Phase) -> Option<FetchRequest> {
        if self.state.is_fetch_in_progress {
            debug!(?phase, "fetch already in flight, acknowledging");
            self.emit(Change::RefreshLoaded);
            return None;
        }

        if cursor.is_none() {
            self.emit(Change::RefreshLoading);
        } else {
            self.emit(Change::PaginationLoading);
        }
        self.state.begin_fetch(cursor.clone());
        self.phase = phase;

        debug!(cursor = ?cursor, ?phase, "starting fetch");
        Some(FetchRequest { cursor, phase })
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Apply the outcome of `request`
    ///
    /// Returns the follow-up fetch when the response calls for an automatic
    /// continuation.
    pub fn complete(&mut self, request: FetchRequest, outcome: Result<Page<R>>) -> Option<FetchRequest> {
        if !self.state.is_fetch_in_progress {
            warn!(cursor = ?request.cursor, "completion without a fetch in flight, ignoring");
            return None;
        }
        self.state.end_fetch();
        self.phase = Phase::Idle;

        let cursor = request.cursor;
        match outcome {
            Err(err) => {
                warn!(cursor = ?cursor, error = %err, "fetch failed");
                if cursor.is_none() {
                    self.emit(Change::RefreshLoaded);
                    self.emit(Change::ErrorOccurred(err.to_string()));
                } else {
                    self.emit(Change::PaginationError);
                }
                None
            }
            Ok(page) if page.is_empty() => self.on_empty_page(cursor, page.next),
            Ok(page) => self.on_batch(cursor, page),
        }
    }

    fn on_empty_page(&mut self, cursor: Option<Cursor>, next: Option<Cursor>) -> Option<FetchRequest> {
        let initial = cursor.is_none();
        let can_retry = self.state.consecutive_empty_retries < self.retry_threshold;
        let initial_has_next = initial && next.is_some();
        let next_differs = matches!((&next, &cursor), (Some(n), Some(c)) if n != c);

        if (initial_has_next || next_differs) && can_retry {
            self.state.consecutive_empty_retries += 1;
            warn!(
                cursor = ?cursor,
                next = ?next,
                attempt = self.state.consecutive_empty_retries,
                "empty page with a next cursor, skipping ahead"
            );
            self.emit(Change::RefreshLoaded);
            return self.begin(next, Phase::FetchingNext);
        }

        if initial && self.state.records.is_empty() && can_retry {
            self.state.consecutive_empty_retries += 1;
            warn!(
                attempt = self.state.consecutive_empty_retries,
                "empty first page, retrying"
            );
            self.emit(Change::RefreshLoaded);
            return self.begin(None, Phase::FetchingInitial);
        }

        warn!(
            cursor = ?cursor,
            retries = self.state.consecutive_empty_retries,
            "giving up on empty response"
        );
        if initial {
            self.emit(Change::RefreshLoaded);
            self.emit(Change::ErrorOccurred(RELOAD_FAILED_MESSAGE.to_string()));
        } else {
            self.emit(Change::PaginationError);
        }
        None
    }

    fn on_batch(&mut self, cursor: Option<Cursor>, page: Page<R>) -> Option<FetchRequest> {
        let Page { records, next } = page;
        self.state.next_cursor = next;
        let after = DisplayState::after_page(self.state.has_next());

        if cursor.is_none() {
            self.emit(Change::RefreshLoaded);
        } else {
            self.emit(Change::PaginationLoaded { state: after });
        }
        self.state.consecutive_empty_retries = 0;

        if cursor.is_none() {
            self.state.replace_records(records);
            self.display = after;
            debug!(count = self.state.records.len(), "records replaced");
            self.emit(Change::Reloaded);
            return None;
        }

        let merged = merge(&self.state.records, records);
        if merged.is_empty() {
            // Same cursor again would refetch the identical page forever.
            let next = match self.state.next_cursor.clone() {
                Some(next) if Some(&next) != cursor.as_ref() => next,
                _ => return None,
            };
            // Bounded, so cursor cycles over known pages terminate.
            if self.duplicate_skips >= self.retry_threshold {
                warn!(
                    cursor = ?cursor,
                    skips = self.duplicate_skips,
                    "pages keep repeating known records, giving up"
                );
                self.emit(Change::PaginationError);
                return None;
            }
            self.duplicate_skips += 1;
            debug!(next = %next, skips = self.duplicate_skips, "page held only known records, skipping ahead");
            return self.begin(Some(next), Phase::FetchingNext);
        }

        self.state.records.extend_unique(merged.unique_new.iter().cloned());
        debug!(
            new = merged.diff_count,
            total = self.state.records.len(),
            "records appended"
        );
        self.emit(Change::Paginated {
            records: merged.unique_new,
            diff_count: merged.diff_count,
        });
        None
    }

    fn emit(&mut self, change: Change<R>) {
        if let Some(display) = change.display_state() {
            self.display = display;
        }
        self.observer.on_change(&change, &self.state);
    }
}

impl<R: Record> std::fmt::Debug for Orchestrator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("phase", &self.phase)
            .field("display", &self.display)
            .field("records", &self.state.records.len())
            .field("next_cursor", &self.state.next_cursor)
            .field("retry_threshold", &self.retry_threshold)
            .field("duplicate_skips", &self.duplicate_skips)
            .finish_non_exhaustive()
    }
}
