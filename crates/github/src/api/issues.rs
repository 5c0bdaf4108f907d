//! Issues API endpoints.

use crate::api::users::Account;
use crate::client::GithubClient;
use crate::error::GithubResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issues API.
pub struct IssuesApi<'a> {
    client: &'a GithubClient,
}

impl<'a> IssuesApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// List issues. The upstream listing also contains pull requests, marked
    /// with a `pull_request` key; callers filter them out.
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        query: &ListIssuesQuery,
    ) -> GithubResult<Vec<Issue>> {
        self.client
            .http
            .get_with_query(&format!("/repos/{}/{}/issues", owner, repo), query)
            .await
    }

    /// Get a single issue.
    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GithubResult<Issue> {
        self.client
            .http
            .get(&format!("/repos/{}/{}/issues/{}", owner, repo, number))
            .await
    }

    /// Open an issue.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateIssueRequest,
    ) -> GithubResult<Issue> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/issues", owner, repo), request)
            .await
    }

    /// Comment on an issue or pull request.
    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &NewComment,
    ) -> GithubResult<IssueComment> {
        self.client
            .http
            .post(
                &format!("/repos/{}/{}/issues/{}/comments", owner, repo, number),
                request,
            )
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListIssuesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Comma-separated label names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Option<Vec<Account>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// Present when the "issue" is actually a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// Labels come back either as bare strings or as objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Name(String),
    Object(LabelObject),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelObject {
    #[serde(default)]
    pub name: Option<String>,
}

impl Label {
    pub fn name(&self) -> Option<&str> {
        match self {
            Label::Name(name) => Some(name),
            Label::Object(object) => object.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_both_shapes() {
        let labels: Vec<Label> =
            serde_json::from_str(r#"["bug", {"name": "help wanted", "color": "008672"}]"#).unwrap();
        assert_eq!(labels[0].name(), Some("bug"));
        assert_eq!(labels[1].name(), Some("help wanted"));
    }
}
