//! Search API endpoints.

use crate::api::repos::Repository;
use crate::client::GithubClient;
use crate::error::GithubResult;
use serde::{Deserialize, Serialize};

/// Search API.
pub struct SearchApi<'a> {
    client: &'a GithubClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Search code.
    pub async fn code(&self, query: &SearchQuery) -> GithubResult<SearchResults<CodeSearchItem>> {
        self.client.http.get_with_query("/search/code", query).await
    }

    /// Search repositories.
    pub async fn repositories(
        &self,
        query: &SearchQuery,
    ) -> GithubResult<SearchResults<Repository>> {
        self.client
            .http
            .get_with_query("/search/repositories", query)
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchItem {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub repository: RepoSlim,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoSlim {
    pub full_name: String,
}
