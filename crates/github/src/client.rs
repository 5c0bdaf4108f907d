//! Main client for the GitHub REST API.

use crate::api::*;
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{GithubError, GithubResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Client for interacting with the GitHub API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    #[allow(dead_code)]
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl GithubClient {
    /// Create a new client builder.
    pub fn builder() -> GithubClientBuilder {
        GithubClientBuilder::new()
    }

    fn from_config(config: ClientConfig) -> GithubResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Get the repositories API.
    pub fn repos(&self) -> ReposApi<'_> {
        ReposApi::new(self)
    }

    /// Get the git data API (blobs, trees, commits, refs).
    pub fn git(&self) -> GitApi<'_> {
        GitApi::new(self)
    }

    /// Get the pull requests API.
    pub fn pulls(&self) -> PullsApi<'_> {
        PullsApi::new(self)
    }

    /// Get the issues API.
    pub fn issues(&self) -> IssuesApi<'_> {
        IssuesApi::new(self)
    }

    /// Get the search API.
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Get the users API.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }
}

/// Builder for creating a GithubClient.
pub struct GithubClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    user_agent: String,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl GithubClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            user_agent: format!("hubcap/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the GitHub API (default: `https://api.github.com`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the access token. Required.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the User-Agent header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client. Fails when no token was provided.
    pub fn build(self) -> GithubResult<GithubClient> {
        let token = self
            .token
            .ok_or_else(|| GithubError::Config("access token is required".to_string()))?;
        if token.is_empty() {
            return Err(GithubError::Config("access token is empty".to_string()));
        }

        let base_url_str = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_str)?;

        let config = ClientConfig {
            base_url,
            token,
            user_agent: self.user_agent,
            timeout: self.timeout,
            retry: self.retry_config,
        };

        GithubClient::from_config(config)
    }
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_token() {
        let result = GithubClient::builder().build();
        match result {
            Err(GithubError::Config(message)) => assert!(message.contains("token")),
            other => panic!("expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_rejects_empty_token() {
        let result = GithubClient::builder().token("").build();
        assert!(matches!(result, Err(GithubError::Config(_))));
    }

    #[test]
    fn test_build_with_defaults() {
        let client = GithubClient::builder().token("ghp_test").build().unwrap();
        assert_eq!(client.config.base_url.as_str(), "https://api.github.com/");
    }
}
