//! Repository API endpoints: contents, branches, commits, repository CRUD.

use crate::api::git::ObjectSha;
use crate::client::GithubClient;
use crate::error::GithubResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repositories API.
pub struct ReposApi<'a> {
    client: &'a GithubClient,
}

impl<'a> ReposApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Get a repository.
    pub async fn get(&self, owner: &str, repo: &str) -> GithubResult<Repository> {
        self.client
            .http
            .get(&format!("/repos/{}/{}", owner, repo))
            .await
    }

    /// Get the contents of a file or directory at a path.
    ///
    /// The upstream endpoint returns an object for a file and an array for a
    /// directory; callers must match on [`Contents`].
    pub async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> GithubResult<Contents> {
        let query = RefQuery {
            reference: reference.map(str::to_string),
        };
        self.client
            .http
            .get_with_query(
                &format!("/repos/{}/{}/contents/{}", owner, repo, path),
                &query,
            )
            .await
    }

    /// Create a file, or replace it when `sha` names the blob being replaced.
    pub async fn create_or_update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &CreateFileRequest,
    ) -> GithubResult<FileCommitResponse> {
        self.client
            .http
            .put(
                &format!("/repos/{}/{}/contents/{}", owner, repo, path),
                request,
            )
            .await
    }

    /// Delete a file.
    pub async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &DeleteFileRequest,
    ) -> GithubResult<FileCommitResponse> {
        self.client
            .http
            .delete_json(
                &format!("/repos/{}/{}/contents/{}", owner, repo, path),
                request,
            )
            .await
    }

    /// List branches.
    pub async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        query: &PageQuery,
    ) -> GithubResult<Vec<Branch>> {
        self.client
            .http
            .get_with_query(&format!("/repos/{}/{}/branches", owner, repo), query)
            .await
    }

    /// Get a single branch with its head commit and tree.
    pub async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> GithubResult<BranchDetail> {
        self.client
            .http
            .get(&format!("/repos/{}/{}/branches/{}", owner, repo, branch))
            .await
    }

    /// List commits.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        query: &ListCommitsQuery,
    ) -> GithubResult<Vec<CommitListItem>> {
        self.client
            .http
            .get_with_query(&format!("/repos/{}/{}/commits", owner, repo), query)
            .await
    }

    /// Get a single commit including per-file stats.
    pub async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> GithubResult<CommitDetail> {
        self.client
            .http
            .get(&format!("/repos/{}/{}/commits/{}", owner, repo, reference))
            .await
    }

    /// Create a repository for the authenticated user.
    pub async fn create_for_authenticated_user(
        &self,
        request: &CreateRepoRequest,
    ) -> GithubResult<Repository> {
        self.client.http.post("/user/repos", request).await
    }

    /// Fork a repository.
    pub async fn create_fork(
        &self,
        owner: &str,
        repo: &str,
        request: &ForkRequest,
    ) -> GithubResult<Repository> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/forks", owner, repo), request)
            .await
    }

    /// List repositories of the authenticated user.
    pub async fn list_for_authenticated_user(
        &self,
        query: &ListReposQuery,
    ) -> GithubResult<Vec<Repository>> {
        self.client.http.get_with_query("/user/repos", query).await
    }
}

#[derive(Debug, Serialize)]
struct RefQuery {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

/// Pagination query shared by list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// A repository as returned by get/create/fork/list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

/// A contents response: an object for a file, an array for a directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Directory(Vec<ContentEntry>),
    File(FileContent),
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// File metadata plus (usually base64) content.
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateFileRequest {
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteFileRequest {
    pub message: String,
    pub sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Response of the contents write/delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommitResponse {
    #[serde(default)]
    pub content: Option<ContentRef>,
    pub commit: CommitSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRef {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// One branch of a branch listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: ObjectSha,
    #[serde(default)]
    pub protected: bool,
}

/// A single branch with its head commit.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchDetail {
    pub name: String,
    pub commit: BranchHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchHead {
    pub sha: String,
    pub commit: HeadCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    pub tree: ObjectSha,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCommitsQuery {
    /// Branch name or commit SHA to start listing from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitListItem {
    pub sha: String,
    pub commit: CommitData,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitData {
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub commit: CommitData,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub stats: Option<CommitStats>,
    #[serde(default)]
    pub files: Option<Vec<CommitFile>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ForkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListReposQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_deserializes_both_shapes() {
        let file: Contents = serde_json::from_str(
            r#"{"name": "README.md", "path": "README.md", "sha": "abc", "size": 5,
                "type": "file", "encoding": "base64", "content": "aGVsbG8=",
                "html_url": "https://github.com/acme/widgets/blob/main/README.md"}"#,
        )
        .unwrap();
        assert!(matches!(file, Contents::File(_)));

        let dir: Contents = serde_json::from_str(
            r#"[{"name": "src", "path": "src", "sha": "def", "size": 0, "type": "dir"}]"#,
        )
        .unwrap();
        match dir {
            Contents::Directory(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].kind, "dir");
            }
            Contents::File(_) => panic!("expected a directory listing"),
        }
    }

    #[test]
    fn test_list_commits_query_skips_absent_fields() {
        let query = ListCommitsQuery {
            sha: Some("main".to_string()),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded, serde_json::json!({"sha": "main"}));
    }
}
