//! Fetch orchestration module
//!
//! The state machine that decides, on every fetch completion, whether to
//! surface data, silently chain another fetch, bump the bounded empty-page
//! retry counter, or report a terminal failure.
//!
//! # Overview
//!
//! - `Orchestrator` - synchronous state machine, no I/O
//! - `Observer` - notification sink, `ChannelObserver` for async consumers
//! - `spawn` / `PaginatorHandle` - tokio actor that runs the machine against
//!   a `FetchPort`

mod driver;
mod machine;
mod observer;

pub use driver::{spawn, PaginatorHandle};
pub use machine::{FetchRequest, Orchestrator, Snapshot};
pub use observer::{ChannelObserver, Observer};
