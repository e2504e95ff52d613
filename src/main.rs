//! git-pr - merge GitHub pull requests with a linear history

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::context::CommandContext;
use cli::list::{ListOptions, run_list};
use cli::style::Stylize;
use linmerge::config::{default_config_path, load_config};
use linmerge::error::Result;
use linmerge::merge::DEFAULT_REMOTE;
use linmerge::types::MergeMode;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Merges GitHub pull requests by rebasing before merging to maintain linear history
#[derive(Parser, Debug)]
#[command(name = "git-pr")]
#[command(version, about, long_about = None)]
struct Cli {
    /// GitHub access token to use
    #[arg(short, long, global = true)]
    token: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the repository
    #[arg(short = 'C', long, default_value = ".", global = true)]
    path: PathBuf,

    /// Remote to fetch from and push to
    #[arg(long, default_value = DEFAULT_REMOTE, global = true)]
    remote: String,

    /// Config file (defaults to ~/.linmergerc)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List open pull requests
    #[command(visible_alias = "ls")]
    List {
        /// List only pull requests opened by me
        #[arg(short, long)]
        mine: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rebase a pull request onto its base and merge it with a merge commit
    Merge {
        /// Pull request number
        number: u64,
    },

    /// Rebase a pull request onto its base and squash it into one commit
    Squash {
        /// Pull request number
        number: u64,
    },

    /// Check or set up GitHub authentication
    Auth,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "linmerge=debug,git_pr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn context(args: &Cli, config_path: &Path) -> Result<CommandContext> {
    CommandContext::new(&args.path, &args.remote, args.token.as_deref(), config_path).await
}

async fn run(args: Cli) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    match args.command {
        Commands::Auth => {
            let config = load_config(&config_path)?;
            cli::auth::run_auth(
                args.token.as_deref(),
                config.auth.github_access_token.as_deref(),
                &config_path,
            )
            .await
        }
        Commands::List { mine, json } => {
            let ctx = context(&args, &config_path).await?;
            run_list(&ctx, &ListOptions { mine, json }).await
        }
        Commands::Merge { number } => {
            let ctx = context(&args, &config_path).await?;
            cli::merge::run_merge(&ctx, number, MergeMode::Merge)
                .await
                .map(drop)
        }
        Commands::Squash { number } => {
            let ctx = context(&args, &config_path).await?;
            cli::merge::run_merge(&ctx, number, MergeMode::Squash)
                .await
                .map(drop)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").error());
            ExitCode::FAILURE
        }
    }
}
