//! Linear merge engine
//!
//! Three layers, mirroring the rest of the crate:
//! 1. Plan - pure decisions (`plan`, `message`, `author`)
//! 2. Ledger - rollback bookkeeping (`ledger`)
//! 3. Execute - the state machine driving git (`execute`)

mod author;
mod execute;
mod ledger;
mod message;
mod plan;
mod progress;

pub use author::attribute_author;
pub use execute::{DEFAULT_REMOTE, MergeOrchestrator, MergeOutcome};
pub use ledger::{DrainReport, UndoAction, UndoFailure, UndoFn, UndoHandle, UndoLedger};
pub use message::{FormatError, render_commit_message};
pub use plan::{
    PREVIEW_CONTEXT_COMMITS, PullRequestCheck, backup_branch_name, check_pull_request,
    resolve_merge_mode,
};
pub use progress::{NoopReporter, Prompter, Reporter};
