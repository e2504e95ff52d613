//! Merge planning - pure decisions
//!
//! No I/O happens here. The orchestrator gathers the inputs and acts on
//! the answers, which keeps these rules easy to unit test.

use crate::config::MergeConfig;
use crate::error::PreflightFailure;
use crate::types::{MergeMode, PrState, PullRequest};
use chrono::NaiveTime;

/// Extra commits shown below the new ones in the push preview
pub const PREVIEW_CONTEXT_COMMITS: usize = 3;

/// Outcome of the pull request state checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestCheck {
    /// Nothing stands in the way
    Ready,
    /// GitHub reports problems; the operator may override
    NeedsOverride(Vec<String>),
}

/// Check a PR snapshot before touching the repository.
///
/// Order matters: a merged PR is also closed, and should be reported as
/// merged.
pub fn check_pull_request(
    pr: &PullRequest,
    requested: MergeMode,
    config: &MergeConfig,
) -> Result<PullRequestCheck, PreflightFailure> {
    if requested == MergeMode::Squash && !config.squash_cmd_enabled {
        return Err(PreflightFailure::SquashDisabled);
    }
    if pr.merged {
        return Err(PreflightFailure::AlreadyMerged(pr.number));
    }
    if pr.state == PrState::Closed {
        return Err(PreflightFailure::Closed(pr.number));
    }

    let mut reasons = Vec::new();
    if !pr.mergeable {
        reasons.push(
            "The pull request merge is blocked by validation rules in this repo".to_string(),
        );
        reasons.push("The pull request has merge conflicts".to_string());
    }
    if !pr.rebaseable {
        reasons.push("The pull request cannot be rebased cleanly onto its base".to_string());
    }

    if reasons.is_empty() {
        Ok(PullRequestCheck::Ready)
    } else {
        Ok(PullRequestCheck::NeedsOverride(reasons))
    }
}

/// Decide how to combine the branch into its base.
///
/// A single-commit PR gains nothing from a merge commit, so it is squashed
/// when `always_squash_single_commit_pulls` is set.
pub const fn resolve_merge_mode(
    requested: MergeMode,
    commits_on_branch: usize,
    config: &MergeConfig,
) -> MergeMode {
    if commits_on_branch == 1 && config.always_squash_single_commit_pulls {
        MergeMode::Squash
    } else {
        requested
    }
}

/// Name of the branch holding the pre-rebase tip of `head`
pub fn backup_branch_name(head: &str, at: NaiveTime) -> String {
    format!("backup/{head}-{}", at.format("%H%M%S"))
}

/// `<branch>@{u}`
pub fn upstream_of(branch: &str) -> String {
    format!("{branch}@{{u}}")
}

/// `<remote>/<branch>`
pub fn remote_branch(remote: &str, branch: &str) -> String {
    format!("{remote}/{branch}")
}

/// Range of commits on `tip` not yet on the upstream of `base`
pub fn new_commits_range(base: &str, tip: &str) -> String {
    format!("{}..{tip}", upstream_of(base))
}

/// Whether a local branch has commits its upstream lacks
pub const fn is_diverged(ahead: usize) -> bool {
    ahead > 0
}
