//! Pull requests API endpoints.

use crate::api::users::Account;
use crate::client::GithubClient;
use crate::error::GithubResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pull requests API.
pub struct PullsApi<'a> {
    client: &'a GithubClient,
}

impl<'a> PullsApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// List pull requests.
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        query: &ListPullsQuery,
    ) -> GithubResult<Vec<PullRequest>> {
        self.client
            .http
            .get_with_query(&format!("/repos/{}/{}/pulls", owner, repo), query)
            .await
    }

    /// Get a single pull request.
    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GithubResult<PullRequest> {
        self.client
            .http
            .get(&format!("/repos/{}/{}/pulls/{}", owner, repo, number))
            .await
    }

    /// Open a pull request.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        request: &CreatePullRequest,
    ) -> GithubResult<PullRequest> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/pulls", owner, repo), request)
            .await
    }

    /// Merge a pull request.
    pub async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &MergeRequest,
    ) -> GithubResult<MergeResult> {
        self.client
            .http
            .put(
                &format!("/repos/{}/{}/pulls/{}/merge", owner, repo, number),
                request,
            )
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPullsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub body: Option<String>,
    pub head: PullRequestRef,
    pub base: PullRequestRef,
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub additions: Option<u64>,
    #[serde(default)]
    pub deletions: Option<u64>,
    #[serde(default)]
    pub changed_files: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeResult {
    #[serde(default)]
    pub sha: Option<String>,
    pub merged: bool,
    pub message: String,
}
