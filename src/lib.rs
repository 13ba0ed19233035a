// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Paginator
//!
//! Client-side pagination orchestration for cursor-based list APIs.
//!
//! The orchestrator keeps an ordered, duplicate-free list of records, asks
//! a [`FetchPort`](fetch::FetchPort) for pages one at a time, skips over
//! empty and fully duplicated pages (up to a bounded number of automatic
//! attempts), and reports every transition to an observer as a
//! [`Change`](pagination::Change).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paginator::config::SourceConfig;
//! use paginator::fetch::HttpFetcher;
//! use paginator::orchestrator::{spawn, ChannelObserver, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> paginator::Result<()> {
//!     let config = SourceConfig::new("https://api.example.com").with_path("/people");
//!     let (observer, mut changes) = ChannelObserver::new();
//!     let handle = spawn(HttpFetcher::new(config)?, Orchestrator::new(observer));
//!
//!     handle.reload()?;
//!     let snapshot = handle.idle().await?;
//!     if let Some(intent) = snapshot.display_state.intent() {
//!         handle.dispatch(intent)?;
//!     }
//!     handle.shutdown().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  commands   ┌──────────────────┐  fetch(cursor)  ┌───────────┐
//! │ handle / CLI │ ──────────▶ │  driver (tokio)  │ ──────────────▶ │ FetchPort │
//! └──────────────┘             │  ┌────────────┐  │ ◀────────────── │  (HTTP)   │
//!        ▲                     │  │ state      │  │   Page / error  └───────────┘
//!        │      Change         │  │ machine    │  │
//!        └──────────────────── │  └────────────┘  │
//!             observer         └──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pagination state, notifications and merging
pub mod pagination;

/// The pagination state machine and its async driver
pub mod orchestrator;

/// Page fetching over HTTP
pub mod fetch;

/// Source definitions
pub mod config;

/// List model for rendering
pub mod presentation;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_source, load_source_from_str, OrchestratorConfig, SourceConfig};
pub use orchestrator::{spawn, Orchestrator, PaginatorHandle};
pub use pagination::{Change, DisplayState, Intent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
