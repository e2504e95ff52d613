//! Merge execution - the linear merge state machine
//!
//! Sequence: preflight, stash, checkout head, update head, backup, rebase,
//! push head, checkout base, update base, merge or squash, preview,
//! confirm, race check, push base, cleanup.
//!
//! Every mutation records its undo action in an [`UndoLedger`]. The ledger
//! is drained exactly once when the run ends, whatever the outcome. Steps
//! that become permanent (the final push) cancel their undo entries first.

use crate::config::MergeConfig;
use crate::error::{Error, PreflightFailure, Result};
use crate::merge::author::attribute_author;
use crate::merge::ledger::{DrainReport, UndoLedger};
use crate::merge::message::render_commit_message;
use crate::merge::plan::{
    PREVIEW_CONTEXT_COMMITS, PullRequestCheck, backup_branch_name, check_pull_request, is_diverged,
    new_commits_range, remote_branch, resolve_merge_mode, upstream_of,
};
use crate::merge::progress::{Prompter, Reporter};
use crate::platform::PullRequestGateway;
use crate::repo::RepositoryGateway;
use crate::types::{MergeMode, PullRequest};
use chrono::{Local, NaiveTime};
use tracing::{debug, info};

/// Default remote name
pub const DEFAULT_REMOTE: &str = "origin";

/// How a run ended, when it didn't end in an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The base branch was pushed
    Merged {
        /// PR number
        number: u64,
        /// How the branch was combined
        mode: MergeMode,
        /// Commits the PR contributed
        commit_count: usize,
    },
    /// The operator declined the preview; everything was rolled back
    Declined {
        /// PR number
        number: u64,
    },
}

/// Run-scoped state
#[derive(Debug, Clone)]
struct WorkflowContext {
    original_branch: String,
    backup_branch: String,
    mode: MergeMode,
    squash_author: Option<String>,
}

/// Result of the mutation phase, before the ledger is drained
enum Applied {
    Pushed {
        mode: MergeMode,
        commit_count: usize,
    },
    Declined,
}

/// Drives a linear merge of one pull request
pub struct MergeOrchestrator<'a> {
    repo: &'a dyn RepositoryGateway,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
    config: &'a MergeConfig,
    remote: String,
    started_at: NaiveTime,
}

impl<'a> MergeOrchestrator<'a> {
    /// Create an orchestrator pushing to `origin`
    pub fn new(
        repo: &'a dyn RepositoryGateway,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
        config: &'a MergeConfig,
    ) -> Self {
        Self {
            repo,
            prompter,
            reporter,
            config,
            remote: DEFAULT_REMOTE.to_string(),
            started_at: Local::now().time(),
        }
    }

    /// Use a different remote
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Fix the time used to name the backup branch
    #[must_use]
    pub const fn with_start_time(mut self, at: NaiveTime) -> Self {
        self.started_at = at;
        self
    }

    /// Fetch the pull request and merge it
    pub async fn merge_pull_request(
        &self,
        platform: &dyn PullRequestGateway,
        number: u64,
        requested: MergeMode,
    ) -> Result<MergeOutcome> {
        self.reporter
            .on_highlight(&format!("Preparing to merge Pull Request #{number}"));
        let pr = platform.get_pull_request(number).await?;
        self.run(&pr, requested)
    }

    /// Merge a pull request snapshot.
    ///
    /// Preflight failures return before the repository is touched. Any
    /// later failure is rolled back before it is returned. If a fatal
    /// rollback step fails, `Error::UndoFailed` replaces the original error.
    pub fn run(&self, pr: &PullRequest, requested: MergeMode) -> Result<MergeOutcome> {
        self.preflight(pr, requested)?;

        let mut ledger = UndoLedger::new();
        let applied = self.apply(pr, requested, &mut ledger);

        if applied.is_err() {
            self.reporter.on_warning("Merge failed, rolling back");
        }

        let report = ledger.drain_all(self.reporter);
        self.finish(pr.number, applied, &report)
    }

    fn finish(
        &self,
        number: u64,
        applied: Result<Applied>,
        report: &DrainReport,
    ) -> Result<MergeOutcome> {
        if let Some(halted) = &report.halted {
            // The rollback failure supersedes the original error; report it first
            if let Err(e) = &applied {
                self.reporter.on_error(&e.to_string());
            }
            return Err(Error::UndoFailed {
                step: halted.label.clone(),
                message: halted.message.clone(),
            });
        }

        match applied? {
            Applied::Pushed { mode, commit_count } => Ok(MergeOutcome::Merged {
                number,
                mode,
                commit_count,
            }),
            Applied::Declined => Ok(MergeOutcome::Declined { number }),
        }
    }

    // =========================================================================
    // Preflight - no mutation, no ledger
    // =========================================================================

    fn preflight(&self, pr: &PullRequest, requested: MergeMode) -> Result<()> {
        if let PullRequestCheck::NeedsOverride(reasons) =
            check_pull_request(pr, requested, self.config)?
        {
            let mut message = String::from(
                "This pull request is not mergeable. This could be due to any of the following:",
            );
            for reason in &reasons {
                message.push_str("\n  - ");
                message.push_str(reason);
            }
            self.reporter.on_warning(&message);

            if !self.prompter.confirm("Do you want to proceed anyway?")? {
                return Err(PreflightFailure::NotMergeable(pr.number).into());
            }
        }

        self.reporter.on_step("Fetching");
        self.repo.fetch(Some(&self.remote), None)?;

        for branch in [&pr.base_ref, &pr.head_ref] {
            self.ensure_not_diverged(branch)?;
        }

        Ok(())
    }

    fn ensure_not_diverged(&self, branch: &str) -> Result<()> {
        if !self.repo.has_local_branch(branch)? {
            debug!(branch, "no local branch, nothing to diverge");
            return Ok(());
        }
        if !self.repo.has_upstream(branch)? {
            debug!(branch, "no upstream, nothing to diverge from");
            return Ok(());
        }

        let counts = self.repo.ahead_behind(branch, &upstream_of(branch))?;
        if is_diverged(counts.ahead) {
            return Err(PreflightFailure::Diverged {
                branch: branch.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // =========================================================================
    // Mutations - every step records its undo
    // =========================================================================

    #[allow(clippy::too_many_lines)]
    fn apply(
        &self,
        pr: &PullRequest,
        requested: MergeMode,
        ledger: &mut UndoLedger<'a>,
    ) -> Result<Applied> {
        let repo = self.repo;
        let reporter = self.reporter;
        let remote = self.remote.clone();
        let head = pr.head_ref.clone();
        let base = pr.base_ref.clone();

        // Stash local changes
        if repo.is_dirty()? {
            reporter.on_step("Stashing local changes");
            repo.stash_push()?;
            ledger.push("re-apply stashed changes", false, move || {
                reporter.on_step("Re-applying stashed changes");
                repo.stash_pop()
            });
        }

        // Branches the run is about to create locally are removed on drain,
        // after the original branch is checked out again
        let mut created = Vec::new();
        for branch in [&base, &head] {
            if repo.has_local_branch(branch)? {
                continue;
            }
            let name = branch.clone();
            let handle = ledger.push("delete created branch", false, move || {
                reporter.on_step(&format!("Deleting the local branch {name}"));
                repo.delete_branch_local(&name, true)
            });
            created.push((branch.clone(), handle));
        }

        // Remember where the operator was
        let original_branch = repo.current_branch()?;
        let restore_original = {
            let original = original_branch.clone();
            ledger.push("check out original branch", false, move || {
                reporter.on_step(&format!("Checking out original branch {original}"));
                repo.checkout(&original)
            })
        };

        // Bring the head branch up to date
        reporter.on_step(&format!("Checking out {head}"));
        repo.checkout(&head)?;
        reporter.on_step(&format!("Updating {head}"));
        repo.pull_rebase()?;

        // Backup before rewriting history
        let mut ctx = WorkflowContext {
            original_branch,
            backup_branch: backup_branch_name(&head, self.started_at),
            mode: requested,
            squash_author: None,
        };
        reporter.on_step(&format!(
            "Creating a backup branch before rebasing: {}",
            ctx.backup_branch
        ));
        repo.create_branch(&ctx.backup_branch)?;
        {
            let backup = ctx.backup_branch.clone();
            ledger.push("delete backup branch", false, move || {
                reporter.on_step(&format!("Deleting the local backup branch {backup}"));
                repo.delete_branch_local(&backup, true)
            });
        }

        // Rebase onto the latest base and publish
        let undo_rebase = {
            let (head, backup, remote) = (head.clone(), ctx.backup_branch.clone(), remote.clone());
            ledger.push("undo rebase", true, move || {
                reporter.on_step("Undoing rebase");
                reporter.on_step(&format!(
                    "Reverting {head} back to original state at {backup}"
                ));
                if let Err(e) = repo.rebase_abort() {
                    debug!(error = %e, "no rebase in progress");
                }
                repo.reset_hard("HEAD")?;
                repo.checkout(&head)?;
                repo.reset_hard(&backup)?;
                reporter.on_step(&format!("Force-pushing {head}"));
                repo.push_force(&remote, &head)
            })
        };

        reporter.on_step(&format!("Updating {base}"));
        repo.fetch(Some(&remote), Some(&format!("{base}:{base}")))?;
        reporter.on_highlight(&format!("Rebasing {head} onto {base}"));
        repo.rebase(&base)?;
        reporter.on_step(&format!("Force-pushing {head}"));
        repo.push_force(&remote, &head)?;

        // Bring the base branch up to date
        reporter.on_step(&format!("Checking out {base}"));
        repo.checkout(&base)?;
        repo.set_upstream(&base, &remote_branch(&remote, &base))?;
        reporter.on_step(&format!("Updating {base}"));
        repo.pull_rebase()?;

        // Combine
        let undo_combine = {
            let base = base.clone();
            ledger.push("undo merge", true, move || {
                reporter.on_step("Undoing merge");
                if let Err(e) = repo.merge_abort() {
                    debug!(error = %e, "no merge in progress");
                }
                repo.checkout(&base)?;
                repo.reset_hard(&upstream_of(&base))
            })
        };

        let branch_commits = repo.log(&new_commits_range(&base, &head))?;
        let commit_count = branch_commits.len();
        ctx.mode = resolve_merge_mode(requested, commit_count, self.config);
        if ctx.mode != requested {
            reporter.on_step("Pull request has a single commit, squashing instead of merging");
        }

        match ctx.mode {
            MergeMode::Squash => {
                let authors: Vec<String> =
                    branch_commits.iter().map(|c| c.author_identity()).collect();
                ctx.squash_author = attribute_author(&authors);
                let author = ctx.squash_author.clone().ok_or_else(|| {
                    Error::Internal(format!("{head} has no commits to squash onto {base}"))
                })?;
                let message = render_commit_message(&self.config.squash_msg_format, pr)?;

                reporter.on_highlight(&format!("Squashing {head} into {base}"));
                repo.merge_squash(&head)?;
                repo.commit(&author, &message)?;
            }
            MergeMode::Merge => {
                let message = render_commit_message(&self.config.merge_msg_format, pr)?;
                reporter.on_highlight(&format!("Merging {head} into {base}"));
                repo.merge(&head, true, &message)?;
            }
        }
        debug!(?ctx, commit_count, "combined");

        // Preview and confirm
        let to_push = repo.log(&new_commits_range(&base, &base))?.len();
        let preview = repo.log_graph(to_push + PREVIEW_CONTEXT_COMMITS)?;
        reporter.on_preview(&preview);
        if !self.prompter.confirm("Does this look correct?")? {
            reporter.on_step("Aborting, rolling back");
            return Ok(Applied::Declined);
        }

        // Nobody may have moved the base branch in the meantime
        repo.fetch(Some(&remote), None)?;
        let counts = repo.ahead_behind(&base, &upstream_of(&base))?;
        if counts.behind > 0 {
            return Err(Error::ConcurrentUpdate { branch: base });
        }

        // Publish
        reporter.on_highlight(&format!("Pushing {base}"));
        repo.push(&remote, &base)?;
        reporter.on_success(&format!(
            "Successfully merged Pull Request #{}",
            pr.number
        ));
        info!(number = pr.number, mode = %ctx.mode, "merged pull request");

        // The merge is live; the rebase and merge must not be reverted now
        ledger.remove(undo_rebase);
        ledger.remove(undo_combine);

        reporter.on_step(&format!("Deleting the pull request branch {head}"));
        if let Err(e) = repo.delete_branch_remote(&remote, &head) {
            // GitHub may already have deleted the branch after the push
            reporter.on_warning(&format!("Could not delete remote branch {head}: {e}"));
        }

        // Stay on the updated base when the operator started on the PR branch
        let stay_on_base = ctx.original_branch == head;
        if stay_on_base {
            ledger.remove(restore_original);
        }
        // The head is deleted below; a created base is kept if we stay on it
        for (branch, handle) in created {
            if branch == head || (stay_on_base && branch == base) {
                ledger.remove(handle);
            }
        }

        if let Err(e) = repo.delete_branch_local(&head, true) {
            reporter.on_warning(&format!("Could not delete local branch {head}: {e}"));
        }

        Ok(Applied::Pushed {
            mode: ctx.mode,
            commit_count,
        })
    }
}
