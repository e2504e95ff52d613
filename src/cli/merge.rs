//! Merge command - linear merge of a single PR

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink, spinner_style};
use crate::cli::{CliReporter, TerminalPrompter};
use anstream::println;
use async_trait::async_trait;
use indicatif::ProgressBar;
use linmerge::error::Result;
use linmerge::merge::{MergeOrchestrator, MergeOutcome};
use linmerge::platform::PullRequestGateway;
use linmerge::types::{MergeMode, PlatformConfig, PullRequest, PullRequestSummary};
use std::time::Duration;

/// Shows a spinner while a pull request is being fetched
struct WithSpinner<'a>(&'a dyn PullRequestGateway);

#[async_trait]
impl PullRequestGateway for WithSpinner<'_> {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("Fetching pull request #{number}..."));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let pr = self.0.get_pull_request(number).await;
        spinner.finish_and_clear();
        pr
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        self.0.list_open_pull_requests().await
    }

    async fn current_user(&self) -> Result<String> {
        self.0.current_user().await
    }

    fn config(&self) -> &PlatformConfig {
        self.0.config()
    }
}

/// Run the merge (or squash) command
pub async fn run_merge(ctx: &CommandContext, number: u64, mode: MergeMode) -> Result<MergeOutcome> {
    let merge_config = ctx.config.merge_config();
    let orchestrator =
        MergeOrchestrator::new(&ctx.repo, &TerminalPrompter, &CliReporter, &merge_config)
            .with_remote(ctx.remote_name.clone());

    let outcome = orchestrator
        .merge_pull_request(&WithSpinner(ctx.platform.as_ref()), number, mode)
        .await?;

    match &outcome {
        MergeOutcome::Merged {
            mode, commit_count, ..
        } => {
            let repo = ctx.platform.config();
            let url = format!(
                "https://github.com/{}/{}/pull/{number}",
                repo.owner, repo.repo
            );
            println!();
            println!(
                "{} Merged {} into {}/{} ({mode}, {commit_count} commit(s))",
                check(),
                hyperlink(&format!("#{number}"), &url).accent(),
                repo.owner,
                repo.repo
            );
        }
        MergeOutcome::Declined { .. } => {
            println!("{}", "Aborted, nothing was pushed".muted());
        }
    }

    Ok(outcome)
}
