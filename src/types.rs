//! Core types for linmerge

use serde::{Deserialize, Serialize};

/// PR state as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of a pull request, fetched once per merge run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// Head commit SHA
    pub head_sha: String,
    /// Login of the PR author
    pub author_username: String,
    /// Display name of the PR author (falls back to the login)
    pub author_display_name: String,
    /// Open or closed
    pub state: PrState,
    /// Whether the PR has been merged
    pub merged: bool,
    /// Whether GitHub considers the PR mergeable
    pub mergeable: bool,
    /// Whether GitHub considers the PR rebaseable
    pub rebaseable: bool,
    /// Web URL for the PR
    pub html_url: String,
}

/// Row of the open pull request listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head branch name
    pub head_ref: String,
    /// Login of the PR author
    pub author_username: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// A single commit from `git log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Commit SHA (hex)
    pub sha: String,
    /// First line of the commit message
    pub subject: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
}

impl CommitSummary {
    /// Author identity in `Name <email>` form, as git expects for `--author`
    pub fn author_identity(&self) -> String {
        format!("{} <{}>", self.author_name, self.author_email)
    }
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// GitHub repository coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

/// How the head branch is combined into the base branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeMode {
    /// Non-fast-forward merge commit, original commits preserved
    Merge,
    /// All commits squashed into a single commit
    Squash,
}

impl std::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
        }
    }
}

/// Commit counts of one ref relative to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AheadBehind {
    /// Commits on the left ref missing from the right
    pub ahead: usize,
    /// Commits on the right ref missing from the left
    pub behind: usize,
}
