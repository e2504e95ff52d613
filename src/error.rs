//! Error types for linmerge

use crate::merge::FormatError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that stop a merge before anything in the repository is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightFailure {
    /// Squash was requested but `squash.squash_cmd_enabled` is off
    #[error("the squash command is disabled in the configuration")]
    SquashDisabled,

    /// PR was already merged
    #[error("pull request #{0} has already been merged")]
    AlreadyMerged(u64),

    /// PR was closed without merging
    #[error("pull request #{0} is closed")]
    Closed(u64),

    /// PR is not mergeable/rebaseable and the operator declined to continue
    #[error("pull request #{0} is not mergeable")]
    NotMergeable(u64),

    /// Local branch has commits its upstream doesn't
    #[error("the local branch `{branch}` has diverged from remote, update it before continuing")]
    Diverged {
        /// Diverged branch name
        branch: String,
    },
}

/// Errors that can occur in linmerge
#[derive(Debug, Error)]
pub enum Error {
    /// Merge refused before any mutation
    #[error(transparent)]
    Preflight(#[from] PreflightFailure),

    /// Base branch upstream moved while we were working
    #[error("the base branch `{branch}` has been updated since we started. Try running this again")]
    ConcurrentUpdate {
        /// Base branch name
        branch: String,
    },

    /// A git command failed
    #[error("git error:\n> {command}\n> {output}")]
    Git {
        /// Command line that was run
        command: String,
        /// Diagnostic output of the command
        output: String,
    },

    /// A fatal rollback step failed; manual intervention needed
    #[error("rollback step `{step}` failed: {message}. The repository needs manual attention")]
    UndoFailed {
        /// Label of the undo step that failed
        step: String,
        /// Failure message
        message: String,
    },

    /// Commit message template could not be rendered
    #[error(transparent)]
    Template(#[from] FormatError),

    /// PR does not exist
    #[error("could not find pull request #{0}")]
    PullRequestNotFound(u64),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Octocrab error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Authentication error
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote could not be found or is not a GitHub remote
    #[error("no GitHub remote found: {0}")]
    RemoteNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Build a git error from a command and its output
    pub fn git(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Git {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Whether this error was raised before any mutation took place
    pub const fn is_preflight(&self) -> bool {
        matches!(self, Self::Preflight(_))
    }
}
