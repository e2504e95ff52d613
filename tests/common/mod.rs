//! Shared test fixtures

#![allow(dead_code)]

pub mod fake_repo;
pub mod git_fixture;
pub mod mock_platform;

#[allow(unused_imports)]
pub use fake_repo::FakeRepository;
#[allow(unused_imports)]
pub use mock_platform::MockPullRequestGateway;

use linmerge::merge::{Prompter, Reporter};
use linmerge::types::{CommitSummary, PrState, PullRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Open, mergeable PR from `feature-x` into `main`
pub fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        body: Some("PR body".to_string()),
        base_ref: "main".to_string(),
        head_ref: "feature-x".to_string(),
        head_sha: format!("head_sha_{number}"),
        author_username: "octocat".to_string(),
        author_display_name: "The Octocat".to_string(),
        state: PrState::Open,
        merged: false,
        mergeable: true,
        rebaseable: true,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Commit authored by `name <name@example.com>`
pub fn make_commit(sha: &str, author: &str) -> CommitSummary {
    CommitSummary {
        sha: sha.to_string(),
        subject: format!("Commit {sha}"),
        author_name: author.to_string(),
        author_email: format!("{}@example.com", author.to_lowercase()),
    }
}

/// Prompter answering from a script; answers "no" once the script runs out
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> linmerge::error::Result<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

/// Severity of a recorded report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Step,
    Warning,
    Error,
    Fatal,
    Preview,
}

/// Reporter capturing everything for assertions
#[derive(Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn on_step(&self, message: &str) {
        self.record(Level::Step, message);
    }

    fn on_warning(&self, message: &str) {
        self.record(Level::Warning, message);
    }

    fn on_error(&self, message: &str) {
        self.record(Level::Error, message);
    }

    fn on_fatal(&self, message: &str) {
        self.record(Level::Fatal, message);
    }

    fn on_preview(&self, lines: &[String]) {
        self.record(Level::Preview, &lines.join("\n"));
    }
}
