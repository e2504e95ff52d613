//! Mock pull request gateway for testing

use async_trait::async_trait;
use linmerge::error::{Error, Result};
use linmerge::platform::PullRequestGateway;
use linmerge::types::{PlatformConfig, PullRequest, PullRequestSummary};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock gateway serving canned pull requests, with call tracking and
/// error injection
pub struct MockPullRequestGateway {
    config: PlatformConfig,
    pull_requests: Mutex<HashMap<u64, PullRequest>>,
    open: Mutex<Vec<PullRequestSummary>>,
    user: Mutex<String>,
    get_calls: Mutex<Vec<u64>>,
    error_on_get: Mutex<Option<String>>,
}

impl MockPullRequestGateway {
    pub fn new() -> Self {
        Self {
            config: PlatformConfig {
                owner: "test".to_string(),
                repo: "repo".to_string(),
            },
            pull_requests: Mutex::new(HashMap::new()),
            open: Mutex::new(Vec::new()),
            user: Mutex::new("octocat".to_string()),
            get_calls: Mutex::new(Vec::new()),
            error_on_get: Mutex::new(None),
        }
    }

    pub fn with_pull_request(self, pr: PullRequest) -> Self {
        self.open.lock().unwrap().push(PullRequestSummary {
            number: pr.number,
            title: pr.title.clone(),
            head_ref: pr.head_ref.clone(),
            author_username: pr.author_username.clone(),
            html_url: pr.html_url.clone(),
        });
        self.pull_requests.lock().unwrap().insert(pr.number, pr);
        self
    }

    pub fn fail_get_with(&self, message: &str) {
        *self.error_on_get.lock().unwrap() = Some(message.to_string());
    }

    pub fn get_calls(&self) -> Vec<u64> {
        self.get_calls.lock().unwrap().clone()
    }
}

impl Default for MockPullRequestGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PullRequestGateway for MockPullRequestGateway {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        self.get_calls.lock().unwrap().push(number);
        if let Some(message) = self.error_on_get.lock().unwrap().clone() {
            return Err(Error::GitHubApi(message));
        }
        self.pull_requests
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or(Error::PullRequestNotFound(number))
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        Ok(self.open.lock().unwrap().clone())
    }

    async fn current_user(&self) -> Result<String> {
        Ok(self.user.lock().unwrap().clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
