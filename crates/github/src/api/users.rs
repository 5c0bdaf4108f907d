//! Users API endpoints.

use crate::client::GithubClient;
use crate::error::GithubResult;
use serde::{Deserialize, Serialize};

/// Users API.
pub struct UsersApi<'a> {
    client: &'a GithubClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Get the authenticated user.
    pub async fn get_authenticated(&self) -> GithubResult<User> {
        self.client.http.get("/user").await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> GithubResult<User> {
        self.client.http.get(&format!("/users/{}", username)).await
    }
}

/// A minimal account reference embedded in other resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub total_private_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub following: Option<u64>,
    #[serde(default)]
    pub html_url: Option<String>,
}
