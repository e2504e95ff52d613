//! Authentication for GitHub
//!
//! Supports an explicit token, environment variables, the config file and
//! the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, test_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line
    Flag,
    /// Token from environment variable
    EnvVar,
    /// Token saved in the config file
    ConfigFile,
    /// Token from the `gh` CLI
    Cli,
    /// Token entered interactively
    Prompt,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--token"),
            Self::EnvVar => write!(f, "environment"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Cli => write!(f, "gh CLI"),
            Self::Prompt => write!(f, "prompt"),
        }
    }
}
