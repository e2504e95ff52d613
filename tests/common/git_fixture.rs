//! Real git repositories in a temp directory
//!
//! Layout: a bare `remote.git`, a `seed` clone used to build history, and a
//! `work` clone the merge engine operates on. History on the remote:
//!
//! ```text
//! main:      Initial commit - Advance main
//! feature-x: Initial commit - Add a - Add b   (authored by Alice)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct GitFixture {
    _dir: TempDir,
    pub remote: PathBuf,
    pub work: PathBuf,
}

/// Run git in `dir`, panicking with its stderr on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn commit_file(dir: &Path, file: &str, message: &str, author: Option<&str>) {
    fs::write(dir.join(file), format!("{message}\n")).unwrap();
    git(dir, &["add", file]);
    match author {
        Some(author) => git(
            dir,
            &["commit", "-m", message, &format!("--author={author}")],
        ),
        None => git(dir, &["commit", "-m", message]),
    };
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let remote = dir.path().join("remote.git");
        let seed = dir.path().join("seed");
        let work = dir.path().join("work");
        let remote_str = remote.to_str().unwrap();

        git(dir.path(), &["init", "--bare", remote_str]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        fs::create_dir(&seed).unwrap();
        git(&seed, &["init"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(&seed);
        git(&seed, &["remote", "add", "origin", remote_str]);

        commit_file(&seed, "README", "Initial commit", None);
        git(&seed, &["push", "origin", "main"]);

        git(&seed, &["checkout", "-b", "feature-x"]);
        let alice = Some("Alice <alice@example.com>");
        commit_file(&seed, "a.txt", "Add a", alice);
        commit_file(&seed, "b.txt", "Add b", alice);
        git(&seed, &["push", "origin", "feature-x"]);

        git(&seed, &["checkout", "main"]);
        commit_file(&seed, "c.txt", "Advance main", None);
        git(&seed, &["push", "origin", "main"]);

        git(dir.path(), &["clone", remote_str, work.to_str().unwrap()]);
        configure_identity(&work);

        Self {
            _dir: dir,
            remote,
            work,
        }
    }

    /// Tip of a branch on the remote, if it exists
    pub fn remote_sha(&self, branch: &str) -> Option<String> {
        let output = Command::new("git")
            .arg("--git-dir")
            .arg(&self.remote)
            .args(["rev-parse", "--verify", "--quiet"])
            .arg(format!("refs/heads/{branch}"))
            .output()
            .unwrap();
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// First-parent subjects of a remote branch, newest first
    pub fn remote_first_parent_subjects(&self, rev: &str) -> Vec<String> {
        git(&self.remote, &["log", "--first-parent", "--format=%s", rev])
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Local branches of the work clone
    pub fn work_branches(&self) -> Vec<String> {
        git(&self.work, &["branch", "--format=%(refname:short)"])
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    pub fn work_current_branch(&self) -> String {
        git(&self.work, &["symbolic-ref", "--short", "HEAD"])
    }
}
