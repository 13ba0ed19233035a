//! Async driver for the state machine
//!
//! Runs an [`Orchestrator`] as a single tokio task. User commands and fetch
//! completions both arrive as messages on that task, so state mutation and
//! notification delivery are serialized no matter where a fetch finishes.
//! Each fetch runs on its own spawned task and reports back exactly once.

use super::machine::{FetchRequest, Orchestrator, Snapshot};
use crate::error::{Error, Result};
use crate::fetch::FetchPort;
use crate::pagination::Intent;
use crate::types::{Page, Record};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

enum Command<R> {
    Reload,
    NextPage,
    Retry,
    Snapshot(oneshot::Sender<Snapshot<R>>),
    WhenIdle(oneshot::Sender<Snapshot<R>>),
}

struct Completion<R> {
    request: FetchRequest,
    outcome: Result<Page<R>>,
}

/// Start driving `orchestrator` against `port` on a new task
///
/// Must be called from within a tokio runtime.
pub fn spawn<R, P>(port: P, orchestrator: Orchestrator<R>) -> PaginatorHandle<R>
where
    R: Record,
    P: FetchPort<R> + 'static,
{
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();

    let driver = Driver {
        machine: orchestrator,
        port: Arc::new(port),
        commands: commands_rx,
        completions_tx,
        completions: completions_rx,
        idle_waiters: Vec::new(),
    };

    PaginatorHandle {
        commands: commands_tx,
        task: tokio::spawn(driver.run()),
    }
}

/// Handle to a running orchestrator
///
/// Commands are queued and applied in order. Dropping the handle (or calling
/// [`shutdown`](Self::shutdown)) lets the in-flight cycle finish, then stops
/// the task.
pub struct PaginatorHandle<R> {
    commands: mpsc::UnboundedSender<Command<R>>,
    task: JoinHandle<()>,
}

impl<R: Record> PaginatorHandle<R> {
    /// Start over from the first page
    pub fn reload(&self) -> Result<()> {
        self.send(Command::Reload)
    }

    /// Fetch the next page
    pub fn next_page(&self) -> Result<()> {
        self.send(Command::NextPage)
    }

    /// Repeat the last attempt
    pub fn retry(&self) -> Result<()> {
        self.send(Command::Retry)
    }

    /// Apply a footer intent
    pub fn dispatch(&self, intent: Intent) -> Result<()> {
        match intent {
            Intent::NextPage => self.next_page(),
            Intent::Retry => self.retry(),
        }
    }

    /// Current state, after every previously sent command has been applied
    pub async fn snapshot(&self) -> Result<Snapshot<R>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// State once no fetch is in flight, including any auto-chained ones
    pub async fn idle(&self) -> Result<Snapshot<R>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::WhenIdle(tx))?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// Stop accepting commands and wait for the in-flight cycle to finish
    pub async fn shutdown(self) -> Result<()> {
        let Self { commands, task } = self;
        drop(commands);
        task.await
            .map_err(|e| Error::Other(format!("Paginator task failed: {e}")))
    }

    fn send(&self, command: Command<R>) -> Result<()> {
        self.commands.send(command).map_err(|_| Error::Closed)
    }
}

impl<R> std::fmt::Debug for PaginatorHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatorHandle")
            .field("closed", &self.commands.is_closed())
            .finish_non_exhaustive()
    }
}

struct Driver<R: Record, P> {
    machine: Orchestrator<R>,
    port: Arc<P>,
    commands: mpsc::UnboundedReceiver<Command<R>>,
    completions_tx: mpsc::UnboundedSender<Completion<R>>,
    completions: mpsc::UnboundedReceiver<Completion<R>>,
    idle_waiters: Vec<oneshot::Sender<Snapshot<R>>>,
}

impl<R, P> Driver<R, P>
where
    R: Record,
    P: FetchPort<R> + 'static,
{
    async fn run(mut self) {
        let mut accepting = true;

        loop {
            tokio::select! {
                command = self.commands.recv(), if accepting => match command {
                    Some(command) => self.handle(command),
                    None => {
                        debug!("all handles dropped, draining in-flight fetch");
                        accepting = false;
                    }
                },
                Some(done) = self.completions.recv() => {
                    let next = self.machine.complete(done.request, done.outcome);
                    self.start(next);
                }
            }

            if !self.machine.is_fetch_in_progress() {
                self.notify_idle();
                if !accepting {
                    break;
                }
            }
        }
        debug!("paginator stopped");
    }

    fn handle(&mut self, command: Command<R>) {
        match command {
            Command::Reload => {
                let request = self.machine.reload();
                self.start(request);
            }
            Command::NextPage => {
                let request = self.machine.next_page();
                self.start(request);
            }
            Command::Retry => {
                let request = self.machine.retry();
                self.start(request);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.machine.snapshot());
            }
            Command::WhenIdle(reply) => self.idle_waiters.push(reply),
        }
    }

    fn start(&self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        let port = Arc::clone(&self.port);
        let completions = self.completions_tx.clone();
        let cursor = request.cursor.clone();

        tokio::spawn(async move {
            // A panicking port still has to produce a completion.
            let outcome = match tokio::spawn(async move { port.fetch(cursor).await }).await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::transport(format!("Fetch task failed: {e}"))),
            };
            let _ = completions.send(Completion { request, outcome });
        });
    }

    fn notify_idle(&mut self) {
        if self.idle_waiters.is_empty() {
            return;
        }
        let snapshot = self.machine.snapshot();
        for waiter in self.idle_waiters.drain(..) {
            let _ = waiter.send(snapshot.clone());
        }
    }
}
