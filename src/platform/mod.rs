//! GitHub access
//!
//! Provides the pull request interface the merge engine depends on.

mod detection;
mod github;

pub use detection::{parse_repo_info, select_github_remote};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PlatformConfig, PullRequest, PullRequestSummary};
use async_trait::async_trait;

/// Pull request operations against the hosting service
///
/// The merge engine only reads pull request state through this trait,
/// allowing tests to substitute an in-memory implementation.
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Get a pull request snapshot
    ///
    /// Fails with `Error::PullRequestNotFound` if there is no such PR.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// List open pull requests, oldest first
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>>;

    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// Get the repository coordinates
    fn config(&self) -> &PlatformConfig;
}
