//! Configuration stored in `~/.linmergerc`.
//!
//! The file is TOML with three sections:
//!
//! ```toml
//! [auth]
//! github_access_token = "ghp_..."
//!
//! [merge]
//! merge_msg_format = "Merge: {TITLE} (#{NUMBER})"
//! always_squash_single_commit_pulls = true
//!
//! [squash]
//! squash_msg_format = "{TITLE} (#{NUMBER})"
//! squash_cmd_enabled = true
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename of the config file in the home directory.
pub const RC_FILE_NAME: &str = ".linmergerc";

/// Default merge commit template.
pub const DEFAULT_MERGE_MSG_FORMAT: &str = "Merge: {TITLE} (#{NUMBER})";

/// Default squash commit template.
pub const DEFAULT_SQUASH_MSG_FORMAT: &str = "{TITLE} (#{NUMBER})";

/// Whole config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[auth]` section
    pub auth: AuthSection,
    /// `[merge]` section
    pub merge: MergeSection,
    /// `[squash]` section
    pub squash: SquashSection,
}

/// `[auth]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Saved GitHub token
    pub github_access_token: Option<String>,
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSection {
    /// Template for merge commits
    pub merge_msg_format: String,
    /// Squash single-commit PRs even when merge was requested
    pub always_squash_single_commit_pulls: bool,
}

impl Default for MergeSection {
    fn default() -> Self {
        Self {
            merge_msg_format: DEFAULT_MERGE_MSG_FORMAT.to_string(),
            always_squash_single_commit_pulls: true,
        }
    }
}

/// `[squash]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashSection {
    /// Template for squash commits
    pub squash_msg_format: String,
    /// Whether the `squash` command may be used
    pub squash_cmd_enabled: bool,
}

impl Default for SquashSection {
    fn default() -> Self {
        Self {
            squash_msg_format: DEFAULT_SQUASH_MSG_FORMAT.to_string(),
            squash_cmd_enabled: true,
        }
    }
}

/// Merge settings consumed by the orchestrator. Read-only for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Template for merge commits
    pub merge_msg_format: String,
    /// Template for squash commits
    pub squash_msg_format: String,
    /// Squash single-commit PRs even when merge was requested
    pub always_squash_single_commit_pulls: bool,
    /// Whether the `squash` command may be used
    pub squash_cmd_enabled: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Config::default().merge_config()
    }
}

impl Config {
    /// Extract the merge settings.
    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            merge_msg_format: self.merge.merge_msg_format.clone(),
            squash_msg_format: self.squash.squash_msg_format.clone(),
            always_squash_single_commit_pulls: self.merge.always_squash_single_commit_pulls,
            squash_cmd_enabled: self.squash.squash_cmd_enabled,
        }
    }
}

/// Path of `~/.linmergerc`.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(RC_FILE_NAME))
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))
}

/// Load config from disk.
///
/// Returns the defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Save a GitHub token into the config file.
///
/// Other keys already in the file are left untouched.
pub fn save_token(path: &Path, token: &str) -> Result<()> {
    let mut table = if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        content
            .parse::<toml::Table>()
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?
    } else {
        toml::Table::new()
    };

    let auth = table
        .entry("auth")
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(auth) = auth else {
        return Err(Error::Config(format!(
            "`auth` in {} is not a table",
            path.display()
        )));
    };
    auth.insert(
        "github_access_token".to_string(),
        toml::Value::String(token.to_string()),
    );

    let content = toml::to_string_pretty(&table)
        .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

    debug!(path = %path.display(), "writing config");
    fs::write(path, content)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
