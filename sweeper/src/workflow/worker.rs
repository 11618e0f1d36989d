//! Single-slot worker threads.
//!
//! Each workflow kind owns one slot; a workflow runs on its own thread so
//! the interactive side never blocks on process I/O. Starting a workflow
//! while one is in flight is rejected, not queued.

use std::fmt;
use std::thread::{self, JoinHandle};

/// The slot is occupied by a running or unharvested workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerBusy;

impl fmt::Display for WorkerBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a workflow of this kind is already in flight")
    }
}

impl std::error::Error for WorkerBusy {}

/// Holds at most one worker thread for one workflow kind.
pub struct WorkerSlot<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T> Default for WorkerSlot<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T: Send + 'static> WorkerSlot<T> {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Starts a workflow on a dedicated thread. Fails while the previous
    /// workflow is still running or its result has not been joined.
    pub fn spawn<F>(&mut self, workflow: F) -> Result<(), WorkerBusy>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.handle.is_some() {
            return Err(WorkerBusy);
        }
        self.handle = Some(thread::spawn(workflow));
        Ok(())
    }

    /// Blocks until the workflow finishes and frees the slot. Returns
    /// `None` if nothing was spawned. A worker panic is resumed here.
    pub fn join(&mut self) -> Option<T> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(value) => Some(value),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
