//! Local repository access
//!
//! The merge engine only talks to git through [`RepositoryGateway`], so it
//! can be driven by an in-memory fake in tests.

mod git;

pub use git::GitRepository;

use crate::error::Result;
use crate::types::{AheadBehind, CommitSummary, GitRemote};

/// Atomic version-control operations against one working copy.
///
/// Every call blocks until git finishes. Methods take `&self`; the working
/// copy is the mutable state.
pub trait RepositoryGateway {
    /// Whether there are uncommitted changes, including untracked files
    fn is_dirty(&self) -> Result<bool>;

    /// Stash all local changes, including untracked files
    fn stash_push(&self) -> Result<()>;

    /// Re-apply and drop the most recent stash
    fn stash_pop(&self) -> Result<()>;

    /// Name of the checked-out branch (commit SHA when detached)
    fn current_branch(&self) -> Result<String>;

    /// Check out a branch or commit
    fn checkout(&self, reference: &str) -> Result<()>;

    /// `git pull --rebase` on the current branch
    fn pull_rebase(&self) -> Result<()>;

    /// Fetch from a remote (default remote when `None`), optionally a single refspec
    fn fetch(&self, remote: Option<&str>, refspec: Option<&str>) -> Result<()>;

    /// Create a branch at HEAD without checking it out
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Delete a local branch
    fn delete_branch_local(&self, name: &str, force: bool) -> Result<()>;

    /// Delete a branch on a remote
    fn delete_branch_remote(&self, remote: &str, name: &str) -> Result<()>;

    /// Rebase the current branch onto `onto`
    fn rebase(&self, onto: &str) -> Result<()>;

    /// Abort an in-progress rebase
    fn rebase_abort(&self) -> Result<()>;

    /// Force-push a branch
    fn push_force(&self, remote: &str, branch: &str) -> Result<()>;

    /// Push a branch
    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Merge `reference` into the current branch
    fn merge(&self, reference: &str, no_fast_forward: bool, message: &str) -> Result<()>;

    /// Stage the squashed changes of `reference` without committing
    fn merge_squash(&self, reference: &str) -> Result<()>;

    /// Abort an in-progress merge
    fn merge_abort(&self) -> Result<()>;

    /// Commit the index with the given author (`Name <email>`)
    fn commit(&self, author: &str, message: &str) -> Result<()>;

    /// `git reset --hard <reference>`
    fn reset_hard(&self, reference: &str) -> Result<()>;

    /// Commits on `left` missing from `right`, and vice versa
    fn ahead_behind(&self, left: &str, right: &str) -> Result<AheadBehind>;

    /// Commits in a revision range, newest first
    fn log(&self, range: &str) -> Result<Vec<CommitSummary>>;

    /// Rendered commit graph of the last `limit` commits on HEAD
    fn log_graph(&self, limit: usize) -> Result<Vec<String>>;

    /// Point `branch` at `upstream` (e.g. `origin/main`)
    fn set_upstream(&self, branch: &str, upstream: &str) -> Result<()>;

    /// Whether a local branch with this name exists
    fn has_local_branch(&self, name: &str) -> Result<bool>;

    /// Whether a local branch has an upstream configured
    fn has_upstream(&self, branch: &str) -> Result<bool>;

    /// Configured remotes
    fn remotes(&self) -> Result<Vec<GitRemote>>;
}
