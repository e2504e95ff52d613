//! In-memory repository for driving the merge engine

use linmerge::error::{Error, Result};
use linmerge::repo::RepositoryGateway;
use linmerge::types::{AheadBehind, CommitSummary, GitRemote};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Operations that change the working copy or a remote
const MUTATING: &[&str] = &[
    "stash_push",
    "stash_pop",
    "checkout",
    "pull_rebase",
    "create_branch",
    "delete_branch_local",
    "delete_branch_remote",
    "rebase",
    "rebase_abort",
    "push_force",
    "push",
    "merge",
    "merge_squash",
    "merge_abort",
    "commit",
    "reset_hard",
    "set_upstream",
];

#[derive(Default)]
struct FakeState {
    calls: Vec<String>,
    dirty: bool,
    current: String,
    local_branches: HashSet<String>,
    without_upstream: HashSet<String>,
    ahead_behind: HashMap<(String, String), VecDeque<AheadBehind>>,
    logs: HashMap<String, Vec<CommitSummary>>,
    graph: Vec<String>,
    failures: HashSet<String>,
    merges: Vec<(String, bool, String)>,
    commits: Vec<(String, String)>,
}

/// Fake repository recording every call.
///
/// Every call is recorded as `"<op> <args...>"`. Failures are injected by
/// op name (`"rebase"`) or by the full call (`"reset_hard HEAD"`).
pub struct FakeRepository {
    state: Mutex<FakeState>,
}

impl FakeRepository {
    /// Clean repository checked out on `branch`, which exists locally
    pub fn on_branch(branch: &str) -> Self {
        let state = FakeState {
            current: branch.to_string(),
            local_branches: HashSet::from([branch.to_string()]),
            graph: vec!["*   Merge: Fix bug (#42) (HEAD -> main)".to_string()],
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.lock().unwrap().dirty = dirty;
    }

    pub fn add_local_branch(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .local_branches
            .insert(name.to_string());
    }

    pub fn remove_upstream(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .without_upstream
            .insert(name.to_string());
    }

    /// Queue ahead/behind answers for a pair; the last one repeats
    pub fn set_ahead_behind(&self, left: &str, right: &str, answers: &[(usize, usize)]) {
        self.state.lock().unwrap().ahead_behind.insert(
            (left.to_string(), right.to_string()),
            answers
                .iter()
                .map(|&(ahead, behind)| AheadBehind { ahead, behind })
                .collect(),
        );
    }

    pub fn set_log(&self, range: &str, commits: Vec<CommitSummary>) {
        self.state
            .lock()
            .unwrap()
            .logs
            .insert(range.to_string(), commits);
    }

    pub fn fail_on(&self, op_or_call: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op_or_call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that would have changed something
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| MUTATING.contains(&op_name(c)))
            .collect()
    }

    pub fn has_call(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }

    /// Index of the first matching call
    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    /// Index of the last matching call
    pub fn last_position(&self, call: &str) -> Option<usize> {
        self.calls().iter().rposition(|c| c == call)
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn current(&self) -> String {
        self.state.lock().unwrap().current.clone()
    }

    pub fn branches(&self) -> HashSet<String> {
        self.state.lock().unwrap().local_branches.clone()
    }

    pub fn merges(&self) -> Vec<(String, bool, String)> {
        self.state.lock().unwrap().merges.clone()
    }

    pub fn commits(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().commits.clone()
    }

    fn record(&self, op: &str, args: &[&str]) -> Result<()> {
        let call = std::iter::once(op)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if state.failures.contains(op) || state.failures.contains(&call) {
            return Err(Error::git(format!("git {call}"), "injected failure"));
        }
        Ok(())
    }
}

fn op_name(call: &str) -> &str {
    call.split(' ').next().unwrap_or_default()
}

impl RepositoryGateway for FakeRepository {
    fn is_dirty(&self) -> Result<bool> {
        self.record("is_dirty", &[])?;
        Ok(self.state.lock().unwrap().dirty)
    }

    fn stash_push(&self) -> Result<()> {
        self.record("stash_push", &[])?;
        self.state.lock().unwrap().dirty = false;
        Ok(())
    }

    fn stash_pop(&self) -> Result<()> {
        self.record("stash_pop", &[])?;
        self.state.lock().unwrap().dirty = true;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.record("current_branch", &[])?;
        Ok(self.current())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.record("checkout", &[reference])?;
        let mut state = self.state.lock().unwrap();
        state.current = reference.to_string();
        state.local_branches.insert(reference.to_string());
        Ok(())
    }

    fn pull_rebase(&self) -> Result<()> {
        self.record("pull_rebase", &[])
    }

    fn fetch(&self, remote: Option<&str>, refspec: Option<&str>) -> Result<()> {
        let args: Vec<&str> = remote.into_iter().chain(refspec).collect();
        self.record("fetch", &args)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record("create_branch", &[name])?;
        self.add_local_branch(name);
        Ok(())
    }

    fn delete_branch_local(&self, name: &str, force: bool) -> Result<()> {
        let mut args = vec![name];
        if force {
            args.push("--force");
        }
        self.record("delete_branch_local", &args)?;
        self.state.lock().unwrap().local_branches.remove(name);
        Ok(())
    }

    fn delete_branch_remote(&self, remote: &str, name: &str) -> Result<()> {
        self.record("delete_branch_remote", &[remote, name])
    }

    fn rebase(&self, onto: &str) -> Result<()> {
        self.record("rebase", &[onto])
    }

    fn rebase_abort(&self) -> Result<()> {
        self.record("rebase_abort", &[])
    }

    fn push_force(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("push_force", &[remote, branch])
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record("push", &[remote, branch])
    }

    fn merge(&self, reference: &str, no_fast_forward: bool, message: &str) -> Result<()> {
        self.record("merge", &[reference])?;
        self.state.lock().unwrap().merges.push((
            reference.to_string(),
            no_fast_forward,
            message.to_string(),
        ));
        Ok(())
    }

    fn merge_squash(&self, reference: &str) -> Result<()> {
        self.record("merge_squash", &[reference])
    }

    fn merge_abort(&self) -> Result<()> {
        self.record("merge_abort", &[])
    }

    fn commit(&self, author: &str, message: &str) -> Result<()> {
        self.record("commit", &[])?;
        self.state
            .lock()
            .unwrap()
            .commits
            .push((author.to_string(), message.to_string()));
        Ok(())
    }

    fn reset_hard(&self, reference: &str) -> Result<()> {
        self.record("reset_hard", &[reference])
    }

    fn ahead_behind(&self, left: &str, right: &str) -> Result<AheadBehind> {
        self.record("ahead_behind", &[left, right])?;
        let mut state = self.state.lock().unwrap();
        let answer = match state
            .ahead_behind
            .get_mut(&(left.to_string(), right.to_string()))
        {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().copied().unwrap_or_default(),
            None => AheadBehind::default(),
        };
        Ok(answer)
    }

    fn log(&self, range: &str) -> Result<Vec<CommitSummary>> {
        self.record("log", &[range])?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .logs
            .get(range)
            .cloned()
            .unwrap_or_default())
    }

    fn log_graph(&self, limit: usize) -> Result<Vec<String>> {
        self.record("log_graph", &[&limit.to_string()])?;
        Ok(self.state.lock().unwrap().graph.clone())
    }

    fn set_upstream(&self, branch: &str, upstream: &str) -> Result<()> {
        self.record("set_upstream", &[branch, upstream])
    }

    fn has_local_branch(&self, name: &str) -> Result<bool> {
        self.record("has_local_branch", &[name])?;
        Ok(self.state.lock().unwrap().local_branches.contains(name))
    }

    fn has_upstream(&self, branch: &str) -> Result<bool> {
        self.record("has_upstream", &[branch])?;
        let state = self.state.lock().unwrap();
        Ok(state.local_branches.contains(branch) && !state.without_upstream.contains(branch))
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        self.record("remotes", &[])?;
        Ok(vec![GitRemote {
            name: "origin".to_string(),
            url: "git@github.com:test/repo.git".to_string(),
        }])
    }
}
