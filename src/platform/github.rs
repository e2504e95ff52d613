//! GitHub service implementation

use crate::error::{Error, Result};
use crate::platform::PullRequestGateway;
use crate::types::{PlatformConfig, PrState, PullRequest, PullRequestSummary};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Public profile of a GitHub user (only the fields we need)
#[derive(Deserialize)]
struct UserProfile {
    login: String,
    name: Option<String>,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service for github.com
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a service talking to a custom API base URL
    pub fn with_base_uri(token: &str, config: PlatformConfig, base_uri: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Display name of a user, falling back to the login
    async fn display_name(&self, login: &str) -> String {
        let route = format!("/users/{login}");
        match self.client.get::<UserProfile, _, ()>(route, None).await {
            Ok(profile) => profile.name.filter(|n| !n.is_empty()).unwrap_or(profile.login),
            Err(e) => {
                debug!(login, error = %e, "could not fetch user profile");
                login.to_string()
            }
        }
    }
}

fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

#[async_trait]
impl PullRequestGateway for GitHubService {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        debug!(number, "getting pull request");

        let pr = match self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await
        {
            Ok(pr) => pr,
            Err(e) if is_not_found(&e) => return Err(Error::PullRequestNotFound(number)),
            Err(e) => return Err(e.into()),
        };

        let state = match pr.state {
            Some(octocrab::models::IssueState::Open) => PrState::Open,
            // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
            Some(_) | None => PrState::Closed,
        };

        let author_username = pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default();
        let author_display_name = if author_username.is_empty() {
            String::new()
        } else {
            self.display_name(&author_username).await
        };

        let result = PullRequest {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            body: pr.body.clone(),
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            head_sha: pr.head.sha.clone(),
            author_username,
            author_display_name,
            state,
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
            mergeable: pr.mergeable.unwrap_or(false),
            rebaseable: pr.rebaseable.unwrap_or(false),
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };

        debug!(number, state = %result.state, merged = result.merged, "got pull request");
        Ok(result)
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        debug!("listing open pull requests");

        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .sort(octocrab::params::pulls::Sort::Created)
            .direction(octocrab::params::Direction::Ascending)
            .per_page(100)
            .send()
            .await?;

        let pulls = self.client.all_pages(page).await?;

        let result: Vec<PullRequestSummary> = pulls
            .into_iter()
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                head_ref: pr.head.ref_field,
                author_username: pr.user.map(|u| u.login).unwrap_or_default(),
                html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            })
            .collect();

        debug!(count = result.len(), "listed open pull requests");
        Ok(result)
    }

    async fn current_user(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        Ok(user.login)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
