//! Observer contract
//!
//! Observers receive every notification together with a read-only view of
//! the state at emission time.

use crate::pagination::{Change, PaginationState};
use crate::types::Record;
use tokio::sync::mpsc;

/// Consumer of orchestrator notifications
///
/// Called synchronously on the orchestrator's execution context; must not
/// block. Must tolerate `RefreshLoaded` without a prior `RefreshLoading`.
pub trait Observer<R: Record>: Send {
    /// Handle one notification
    fn on_change(&mut self, change: &Change<R>, state: &PaginationState<R>);
}

impl<R, F> Observer<R> for F
where
    R: Record,
    F: FnMut(&Change<R>, &PaginationState<R>) + Send,
{
    fn on_change(&mut self, change: &Change<R>, state: &PaginationState<R>) {
        self(change, state);
    }
}

/// Forwards notifications onto an unbounded channel
///
/// Lets an async consumer follow the orchestrator without running inside it.
/// Notifications sent after the receiver is dropped are discarded.
#[derive(Debug)]
pub struct ChannelObserver<R> {
    tx: mpsc::UnboundedSender<Change<R>>,
}

impl<R: Record> ChannelObserver<R> {
    /// Create an observer and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Change<R>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<R: Record> Observer<R> for ChannelObserver<R> {
    fn on_change(&mut self, change: &Change<R>, _state: &PaginationState<R>) {
        let _ = self.tx.send(change.clone());
    }
}
