//! Client configuration.

use std::time::Duration;
use url::Url;

/// Settings shared by every request the client makes. Built once by the
/// client builder and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API root, `https://api.github.com` unless overridden.
    pub base_url: Url,
    /// Personal access token sent as a bearer credential.
    pub token: String,
    /// GitHub rejects requests without a User-Agent.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
}

/// Retry policy: exponential backoff with a cap, applied to retryable
/// statuses and timeouts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// How many times a failed request may be replayed.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub base_delay: Duration,
    /// Ceiling for the doubling delay.
    pub max_delay: Duration,
    /// Status codes worth replaying.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// A policy that gives up immediately.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(12))
            .min(self.max_delay)
    }

    /// Whether a response status warrants a replay.
    pub fn retries_on(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}
