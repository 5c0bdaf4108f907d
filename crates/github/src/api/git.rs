//! Git data API endpoints: blobs, trees, commits, refs.
//!
//! These are the low-level primitives behind multi-file pushes: create the
//! blobs, layer a tree over the base tree, commit it, then move the ref.

use crate::client::GithubClient;
use crate::error::GithubResult;
use serde::{Deserialize, Serialize};

/// Git data API.
pub struct GitApi<'a> {
    client: &'a GithubClient,
}

impl<'a> GitApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Create a blob.
    pub async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        request: &NewBlob,
    ) -> GithubResult<ObjectSha> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/git/blobs", owner, repo), request)
            .await
    }

    /// Create a tree, optionally layered over a base tree.
    pub async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        request: &NewTree,
    ) -> GithubResult<ObjectSha> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/git/trees", owner, repo), request)
            .await
    }

    /// Create a commit object.
    pub async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        request: &NewCommit,
    ) -> GithubResult<GitCommit> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/git/commits", owner, repo), request)
            .await
    }

    /// Create a reference (e.g. `refs/heads/feature-x`).
    pub async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        request: &NewRef,
    ) -> GithubResult<GitRef> {
        self.client
            .http
            .post(&format!("/repos/{}/{}/git/refs", owner, repo), request)
            .await
    }

    /// Move an existing reference. `reference` is the short form, e.g.
    /// `heads/main`.
    pub async fn update_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        request: &UpdateRef,
    ) -> GithubResult<GitRef> {
        self.client
            .http
            .patch(
                &format!("/repos/{}/{}/git/refs/{}", owner, repo, reference),
                request,
            )
            .await
    }
}

/// A bare object pointer, returned by blob and tree creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSha {
    pub sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<String>,
    pub tree: Vec<TreeItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeItem {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeItem {
    /// A regular-file blob entry.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "100644".to_string(),
            kind: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRef {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub url: Option<String>,
    pub object: ObjectSha,
}
