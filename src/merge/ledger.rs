//! Undo ledger - rollback of partially applied merges
//!
//! Every step that changes the working copy or the remote records how to
//! revert itself here. The ledger is drained once, in reverse push order,
//! when the run ends.

use crate::error::Result;
use crate::merge::progress::Reporter;
use tracing::{debug, error};

/// Handle to an entry, used to cancel it once its step is permanent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoHandle(u64);

/// Effectful rollback procedure
pub type UndoFn<'a> = Box<dyn FnOnce() -> Result<()> + 'a>;

/// A single reversible operation
pub struct UndoAction<'a> {
    handle: UndoHandle,
    label: String,
    fatal_on_failure: bool,
    operation: UndoFn<'a>,
}

impl std::fmt::Debug for UndoAction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoAction")
            .field("handle", &self.handle)
            .field("label", &self.label)
            .field("fatal_on_failure", &self.fatal_on_failure)
            .finish_non_exhaustive()
    }
}

/// Failure of an undo action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoFailure {
    /// Label of the failed action
    pub label: String,
    /// Error message
    pub message: String,
}

/// What happened while draining the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Labels of actions that ran successfully, in execution order
    pub completed: Vec<String>,
    /// Non-fatal failures (unwinding continued past these)
    pub failures: Vec<UndoFailure>,
    /// Fatal failure that stopped unwinding
    pub halted: Option<UndoFailure>,
    /// Labels of actions never run because of the fatal failure
    pub skipped: Vec<String>,
}

impl DrainReport {
    /// Whether every action ran successfully
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.halted.is_none()
    }
}

/// LIFO stack of undo actions, scoped to one merge run
#[derive(Debug, Default)]
pub struct UndoLedger<'a> {
    entries: Vec<UndoAction<'a>>,
    next_handle: u64,
}

impl<'a> UndoLedger<'a> {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an undo action. Returns a handle that can cancel it later.
    pub fn push<F>(
        &mut self,
        label: impl Into<String>,
        fatal_on_failure: bool,
        operation: F,
    ) -> UndoHandle
    where
        F: FnOnce() -> Result<()> + 'a,
    {
        let handle = UndoHandle(self.next_handle);
        self.next_handle += 1;
        let label = label.into();
        debug!(label = %label, fatal_on_failure, "recorded undo action");
        self.entries.push(UndoAction {
            handle,
            label,
            fatal_on_failure,
            operation: Box::new(operation),
        });
        handle
    }

    /// Cancel a previously pushed action. Returns `false` if it was not present.
    pub fn remove(&mut self, handle: UndoHandle) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.handle == handle) else {
            return false;
        };
        let entry = self.entries.remove(index);
        debug!(label = %entry.label, "cancelled undo action");
        true
    }

    /// Number of pending actions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no pending actions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of pending actions, oldest first
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Run every pending action, most recently pushed first.
    ///
    /// A failing non-fatal action is reported and unwinding continues. A
    /// failing fatal action is reported at the highest severity and stops
    /// unwinding; older actions are never run.
    pub fn drain_all(mut self, reporter: &dyn Reporter) -> DrainReport {
        let mut report = DrainReport::default();

        while let Some(entry) = self.entries.pop() {
            let UndoAction {
                label,
                fatal_on_failure,
                operation,
                ..
            } = entry;

            match operation() {
                Ok(()) => report.completed.push(label),
                Err(e) if fatal_on_failure => {
                    error!(label = %label, error = %e, "fatal undo failure");
                    reporter.on_fatal(&format!("Rollback step `{label}` failed: {e}"));
                    report.halted = Some(UndoFailure {
                        label,
                        message: e.to_string(),
                    });
                    report.skipped = self.entries.drain(..).rev().map(|e| e.label).collect();
                    break;
                }
                Err(e) => {
                    reporter.on_error(&format!("Rollback step `{label}` failed: {e}"));
                    report.failures.push(UndoFailure {
                        label,
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
