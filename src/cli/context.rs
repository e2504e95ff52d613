//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the list and merge commands.

use crate::cli::auth::ensure_authenticated;
use linmerge::config::{Config, load_config};
use linmerge::error::Result;
use linmerge::platform::{GitHubService, PullRequestGateway, select_github_remote};
use linmerge::repo::{GitRepository, RepositoryGateway};
use std::path::Path;

/// Shared context for CLI commands that interact with GitHub
///
/// This struct encapsulates the common setup:
/// - Opening the git repository
/// - Loading the config file
/// - Selecting the GitHub remote
/// - Authenticating and creating the service
pub struct CommandContext {
    /// The git repository
    pub repo: GitRepository,
    /// Loaded configuration
    pub config: Config,
    /// GitHub service
    pub platform: Box<dyn PullRequestGateway>,
    /// Selected remote name
    pub remote_name: String,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(
        path: &Path,
        remote: &str,
        token: Option<&str>,
        config_path: &Path,
    ) -> Result<Self> {
        let repo = GitRepository::open(path)?;
        let config = load_config(config_path)?;

        let remotes = repo.remotes()?;
        let (selected, platform_config) = select_github_remote(&remotes, remote)?;
        let remote_name = selected.name.clone();

        let auth = ensure_authenticated(
            token,
            config.auth.github_access_token.as_deref(),
            config_path,
        )
        .await?;
        let platform = Box::new(GitHubService::new(&auth.token, platform_config)?);

        Ok(Self {
            repo,
            config,
            platform,
            remote_name,
        })
    }
}
