//! # hubcap-github
//!
//! Typed async client for the GitHub REST API.
//!
//! ```rust,no_run
//! use hubcap_github::{GithubClient, GithubResult};
//!
//! #[tokio::main]
//! async fn main() -> GithubResult<()> {
//!     let client = GithubClient::builder()
//!         .token("ghp_your_token")
//!         .build()?;
//!
//!     let repo = client.repos().get("acme", "widgets").await?;
//!     println!("default branch: {:?}", repo.default_branch);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{GithubClient, GithubClientBuilder, DEFAULT_BASE_URL};
pub use config::{ClientConfig, RetryConfig};
pub use error::{GithubError, GithubResult};
