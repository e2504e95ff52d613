//! GitHub repository detection from remote URLs

use crate::error::{Error, Result};
use crate::types::{GitRemote, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// scp-like syntax: `git@github.com:owner/repo.git`
static SCP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/]+@)?(?P<host>[^:/]+):(?P<path>[^/].*)$").expect("scp regex is valid")
});

fn is_github_host(host: &str) -> bool {
    host == "github.com" || host.ends_with(".github.com")
}

fn split_owner_repo(path: &str, url: &str) -> Result<PlatformConfig> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(PlatformConfig {
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
        }),
        _ => Err(Error::RemoteNotFound(format!(
            "cannot parse owner/repo from {url}"
        ))),
    }
}

/// Parse GitHub owner/repo from a remote URL.
///
/// Accepts `https://github.com/o/r(.git)`, `ssh://git@github.com/o/r(.git)`
/// and `git@github.com:o/r(.git)`. Anything not hosted on GitHub is an error.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    if let Ok(parsed) = Url::parse(url)
        && parsed.has_host()
    {
        let host = parsed.host_str().unwrap_or_default();
        if !is_github_host(host) {
            return Err(Error::RemoteNotFound(format!("{url} is not a GitHub URL")));
        }
        return split_owner_repo(parsed.path(), url);
    }

    if let Some(caps) = SCP_RE.captures(url) {
        if !is_github_host(&caps["host"]) {
            return Err(Error::RemoteNotFound(format!("{url} is not a GitHub URL")));
        }
        return split_owner_repo(&caps["path"], url);
    }

    Err(Error::RemoteNotFound(format!("unrecognised remote URL {url}")))
}

/// Pick the remote to talk to GitHub through.
///
/// Prefers the named remote; otherwise the first remote that points at GitHub.
pub fn select_github_remote<'a>(
    remotes: &'a [GitRemote],
    preferred: &str,
) -> Result<(&'a GitRemote, PlatformConfig)> {
    if let Some(remote) = remotes.iter().find(|r| r.name == preferred)
        && let Ok(config) = parse_repo_info(&remote.url)
    {
        return Ok((remote, config));
    }

    remotes
        .iter()
        .find_map(|r| parse_repo_info(&r.url).ok().map(|config| (r, config)))
        .ok_or_else(|| Error::RemoteNotFound("this is not a GitHub repository".to_string()))
}
