//! GitHub token resolution and validation

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use reqwest::Client;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Default GitHub API endpoint
const GITHUB_API: &str = "https://api.github.com";

/// A resolved GitHub token
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// The token
    pub token: String,
    /// Where it came from
    pub source: AuthSource,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Ask the `gh` CLI for its token
async fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().await.ok()?;
    if !output.status.success() {
        debug!("gh auth token returned non-zero");
        return None;
    }
    non_empty(Some(&String::from_utf8_lossy(&output.stdout)))
}

/// Find a GitHub token.
///
/// Order: explicit flag, `GITHUB_TOKEN`, `GH_TOKEN`, config file, `gh auth token`.
pub async fn get_github_auth(
    flag: Option<&str>,
    config_token: Option<&str>,
) -> Result<GitHubAuthConfig> {
    if let Some(token) = non_empty(flag) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Flag,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Some(token) = non_empty(std::env::var(var).ok().as_deref()) {
            debug!(var, "using token from environment");
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = non_empty(config_token) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::ConfigFile,
        });
    }

    if let Some(token) = gh_cli_token().await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no access token was specified or previously saved".to_string(),
    ))
}

/// Check that a token is accepted by GitHub.
///
/// `api_base` overrides the API endpoint (used by tests).
pub async fn test_github_auth(token: &str, api_base: Option<&str>) -> Result<bool> {
    let base = api_base.unwrap_or(GITHUB_API).trim_end_matches('/');

    let client = Client::builder()
        .user_agent("git-pr-linmerge")
        .build()
        .map_err(|e| Error::Auth(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(format!("{base}/user"))
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| Error::Auth(format!("failed to reach GitHub: {e}")))?;

    let ok = response.status().is_success();
    debug!(status = %response.status(), ok, "tested GitHub token");
    Ok(ok)
}
