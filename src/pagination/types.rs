//! Pagination types
//!
//! Notifications emitted by the orchestrator and the footer display state
//! they drive.

/// State-change notification delivered to observers
///
/// Delivered in emission order, one at a time, never coalesced.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<R> {
    /// An initial (cursor-less) fetch started
    RefreshLoading,
    /// An initial fetch finished, or a command was ignored while in flight
    RefreshLoaded,
    /// A cursor fetch started
    PaginationLoading,
    /// A cursor fetch returned records
    PaginationLoaded {
        /// Footer state after this page
        state: DisplayState,
    },
    /// A cursor fetch failed or gave up
    PaginationError,
    /// The record set was replaced wholesale
    Reloaded,
    /// New records were appended at the tail
    Paginated {
        /// Only the records that were not already present
        records: Vec<R>,
        /// Number of appended records
        diff_count: usize,
    },
    /// An initial load failed
    ErrorOccurred(String),
}

impl<R> Change<R> {
    /// Short name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RefreshLoading => "refresh_loading",
            Self::RefreshLoaded => "refresh_loaded",
            Self::PaginationLoading => "pagination_loading",
            Self::PaginationLoaded { .. } => "pagination_loaded",
            Self::PaginationError => "pagination_error",
            Self::Reloaded => "reloaded",
            Self::Paginated { .. } => "paginated",
            Self::ErrorOccurred(_) => "error_occurred",
        }
    }

    /// Footer state implied by this notification, if it changes it
    pub fn display_state(&self) -> Option<DisplayState> {
        match self {
            Self::PaginationLoading => Some(DisplayState::Paginating),
            Self::PaginationLoaded { state } => Some(*state),
            Self::PaginationError => Some(DisplayState::Fail),
            _ => None,
        }
    }
}

/// Display state of the "load more" footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// A page is being fetched
    Paginating,
    /// More pages can be requested
    #[default]
    Idle,
    /// The server reported no further pages
    Done,
    /// The last page request failed
    Fail,
}

impl DisplayState {
    /// Footer state after a page whose next cursor presence is `has_next`
    pub fn after_page(has_next: bool) -> Self {
        if has_next {
            Self::Idle
        } else {
            Self::Done
        }
    }

    /// What the footer widget shows for this state
    pub fn config(self) -> FooterConfig {
        match self {
            Self::Paginating => FooterConfig::new(true, "Incoming...", None),
            Self::Idle => FooterConfig::new(false, "Do you want more?", Some("Load More")),
            Self::Done => FooterConfig::new(false, "Thats all mate.", None),
            Self::Fail => FooterConfig::new(false, "Error ocurred :(", Some("Retry")),
        }
    }

    /// Command a tap on the footer action maps to
    pub fn intent(self) -> Option<Intent> {
        match self {
            Self::Idle => Some(Intent::NextPage),
            Self::Fail => Some(Intent::Retry),
            Self::Paginating | Self::Done => None,
        }
    }
}

/// Presentation of one footer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterConfig {
    /// Whether a spinner is shown
    pub show_loading: bool,
    /// Footer text
    pub title: &'static str,
    /// Action button label, `None` hides the button
    pub action_title: Option<&'static str>,
}

impl FooterConfig {
    const fn new(show_loading: bool, title: &'static str, action_title: Option<&'static str>) -> Self {
        Self {
            show_loading,
            title,
            action_title,
        }
    }
}

/// User intent emitted by the footer widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Request the next page
    NextPage,
    /// Retry the last failed attempt
    Retry,
}

/// What the orchestrator is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No fetch in flight
    #[default]
    Idle,
    /// Fetching without a cursor
    FetchingInitial,
    /// Fetching a cursor page
    FetchingNext,
    /// Re-running the last attempt on user request
    FetchingRetry,
}

impl Phase {
    /// Whether a fetch is in flight
    pub fn is_fetching(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
