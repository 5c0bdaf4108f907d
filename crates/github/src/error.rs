//! Error types for the GitHub client.

use serde::Deserialize;

/// Result type for GitHub client operations.
pub type GithubResult<T> = Result<T, GithubError>;

/// Error types that can occur when talking to the GitHub API.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// HTTP request failed before a response was obtained.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response not covered by a more specific variant.
    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials rejected or access forbidden.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Write rejected because of conflicting upstream state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Rate limited.
    #[error("rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GithubError {
    /// Classify an error response by status code and body.
    pub fn from_response(status: u16, body: &str, retry_after_secs: Option<u64>) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            401 | 403 => Self::Permission(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            429 => Self::RateLimited { retry_after_secs },
            _ => Self::Api { status, message },
        }
    }
}
