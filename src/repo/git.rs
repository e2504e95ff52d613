//! `RepositoryGateway` backed by the `git` binary

use crate::error::{Error, Result};
use crate::repo::RepositoryGateway;
use crate::types::{AheadBehind, CommitSummary, GitRemote};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Field separator for `git log` output (ASCII unit separator)
const FIELD_SEP: char = '\u{1f}';

/// Remote used when a refspec is fetched without naming one
const DEFAULT_REMOTE: &str = "origin";

/// A git working copy driven through the `git` CLI
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()?;

        if !output.status.success() {
            return Err(Error::Internal(format!(
                "{} is not a valid git repository",
                path.display()
            )));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(root = %root.display(), "opened git repository");
        Ok(Self { root })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.root)
            .args(args)
            .env("GIT_MERGE_AUTOEDIT", "no");
        cmd
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "running git");
        Ok(self.command(args).output()?)
    }

    /// Run git, returning stdout or a `Git` error carrying the diagnostics
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let diagnostics = if stderr.is_empty() { stdout } else { stderr };

        debug!(?args, status = ?output.status.code(), "git command failed");
        Err(Error::git(
            format!("git {}", args.join(" ")),
            strip_progress(&diagnostics).replace('\n', "\n> "),
        ))
    }
}

/// Keep only the final state of `\r`-overwritten progress lines
fn strip_progress(output: &str) -> String {
    output
        .lines()
        .filter_map(|line| line.rsplit('\r').find(|segment| !segment.trim().is_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `git rev-list --left-right --count` output
fn parse_ahead_behind(output: &str) -> Result<AheadBehind> {
    let mut parts = output.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next()) {
        (Some(Ok(ahead)), Some(Ok(behind))) => Ok(AheadBehind { ahead, behind }),
        _ => Err(Error::Internal(format!(
            "unexpected rev-list output: {output:?}"
        ))),
    }
}

/// Parse `git log` output produced with [`FIELD_SEP`]-separated fields
fn parse_log(output: &str) -> Vec<CommitSummary> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.split(FIELD_SEP);
            Some(CommitSummary {
                sha: fields.next()?.to_string(),
                subject: fields.next()?.to_string(),
                author_name: fields.next()?.to_string(),
                author_email: fields.next()?.to_string(),
            })
        })
        .collect()
}

/// Parse `git remote -v` output, one entry per remote
fn parse_remotes(output: &str) -> Vec<GitRemote> {
    let mut remotes: Vec<GitRemote> = Vec::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !remotes.iter().any(|r| r.name == name) {
            remotes.push(GitRemote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }
    remotes
}

impl RepositoryGateway for GitRepository {
    fn is_dirty(&self) -> Result<bool> {
        let status = self.run(&["status", "--porcelain", "--untracked-files=all"])?;
        Ok(!status.trim().is_empty())
    }

    fn stash_push(&self) -> Result<()> {
        self.run(&["stash", "push", "--include-untracked"]).map(drop)
    }

    fn stash_pop(&self) -> Result<()> {
        self.run(&["stash", "pop"]).map(drop)
    }

    fn current_branch(&self) -> Result<String> {
        if let Ok(branch) = self.run(&["symbolic-ref", "--quiet", "--short", "HEAD"]) {
            return Ok(branch.trim().to_string());
        }
        // Detached HEAD: restore to the commit itself
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.run(&["checkout", reference]).map(drop)
    }

    fn pull_rebase(&self) -> Result<()> {
        self.run(&["pull", "--rebase"]).map(drop)
    }

    fn fetch(&self, remote: Option<&str>, refspec: Option<&str>) -> Result<()> {
        let mut args = vec!["fetch"];
        match (remote, refspec) {
            (Some(remote), Some(refspec)) => args.extend([remote, refspec]),
            (None, Some(refspec)) => args.extend([DEFAULT_REMOTE, refspec]),
            (Some(remote), None) => args.push(remote),
            (None, None) => {}
        }
        self.run(&args).map(drop)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", name]).map(drop)
    }

    fn delete_branch_local(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name]).map(drop)
    }

    fn delete_branch_remote(&self, remote: &str, name: &str) -> Result<()> {
        self.run(&["push", remote, "--delete", "--no-verify", name])
            .map(drop)
    }

    fn rebase(&self, onto: &str) -> Result<()> {
        self.run(&["rebase", onto]).map(drop)
    }

    fn rebase_abort(&self) -> Result<()> {
        self.run(&["rebase", "--abort"]).map(drop)
    }

    fn push_force(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, "--force", "--no-verify", branch])
            .map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, "--no-verify", branch]).map(drop)
    }

    fn merge(&self, reference: &str, no_fast_forward: bool, message: &str) -> Result<()> {
        let mut args = vec!["merge"];
        if no_fast_forward {
            args.push("--no-ff");
        }
        args.extend(["-m", message, reference]);
        self.run(&args).map(drop)
    }

    fn merge_squash(&self, reference: &str) -> Result<()> {
        self.run(&["merge", "--squash", reference]).map(drop)
    }

    fn merge_abort(&self) -> Result<()> {
        self.run(&["merge", "--abort"]).map(drop)
    }

    fn commit(&self, author: &str, message: &str) -> Result<()> {
        let author_arg = format!("--author={author}");
        self.run(&["commit", &author_arg, "-m", message]).map(drop)
    }

    fn reset_hard(&self, reference: &str) -> Result<()> {
        self.run(&["reset", "--hard", reference]).map(drop)
    }

    fn ahead_behind(&self, left: &str, right: &str) -> Result<AheadBehind> {
        let range = format!("{left}...{right}");
        let output = self.run(&["rev-list", "--left-right", "--count", &range])?;
        parse_ahead_behind(&output)
    }

    fn log(&self, range: &str) -> Result<Vec<CommitSummary>> {
        let format = format!("--format=%H{FIELD_SEP}%s{FIELD_SEP}%an{FIELD_SEP}%ae");
        let output = self.run(&["log", &format, range])?;
        Ok(parse_log(&output))
    }

    fn log_graph(&self, limit: usize) -> Result<Vec<String>> {
        let count = format!("-{limit}");
        let output = self.run(&[
            "log",
            "--graph",
            "--decorate",
            "--color=never",
            "--pretty=format:%s%d",
            &count,
        ])?;
        Ok(output.lines().map(ToString::to_string).collect())
    }

    fn set_upstream(&self, branch: &str, upstream: &str) -> Result<()> {
        let arg = format!("--set-upstream-to={upstream}");
        self.run(&["branch", &arg, branch]).map(drop)
    }

    fn has_local_branch(&self, name: &str) -> Result<bool> {
        let full = format!("refs/heads/{name}");
        let output = self.output(&["show-ref", "--verify", "--quiet", &full])?;
        Ok(output.status.success())
    }

    fn has_upstream(&self, branch: &str) -> Result<bool> {
        let upstream = format!("{branch}@{{u}}");
        let output = self.output(&["rev-parse", "--verify", "--quiet", &upstream])?;
        Ok(output.status.success())
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        let output = self.run(&["remote", "-v"])?;
        Ok(parse_remotes(&output))
    }
}
