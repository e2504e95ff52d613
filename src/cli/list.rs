//! List command - open pull requests

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use comfy_table::{Table, presets::NOTHING};
use linmerge::error::{Error, Result};
use linmerge::types::PullRequestSummary;

/// Longest title shown in the table
const MAX_TITLE_CHARS: usize = 60;

/// Options for the list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only PRs opened by the authenticated user
    pub mine: bool,
    /// Print JSON instead of a table
    pub json: bool,
}

fn truncate(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Build the PR table
pub fn render_table(pulls: &[PullRequestSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(vec!["#", "Title", "Branch"]);
    for pr in pulls {
        table.add_row(vec![
            pr.number.to_string(),
            truncate(&pr.title),
            pr.head_ref.clone(),
        ]);
    }
    table
}

/// Run the list command
pub async fn run_list(ctx: &CommandContext, options: &ListOptions) -> Result<()> {
    let mut pulls = ctx.platform.list_open_pull_requests().await?;

    if options.mine {
        let me = ctx.platform.current_user().await?;
        pulls.retain(|pr| pr.author_username == me);
    }

    if options.json {
        let json = serde_json::to_string_pretty(&pulls)
            .map_err(|e| Error::Internal(format!("Failed to serialize pull requests: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    if pulls.is_empty() {
        println!("{}", "No pull requests found".muted());
        return Ok(());
    }

    println!();
    println!("{}", render_table(&pulls));
    Ok(())
}
