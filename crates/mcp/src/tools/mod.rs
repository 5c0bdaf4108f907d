// Tool trait, error taxonomy, and the per-domain tool implementations.

use crate::schema::{FieldKind, Schema, ValidationError};
use hubcap_github::GithubError;
use serde::de::DeserializeOwned;

mod branches;
mod commits;
mod files;
mod issues;
mod pulls;
mod registry;
mod repos;
mod search;
mod tasklog;
mod users;

pub use branches::{CreateBranchTool, ListBranchesTool};
pub use commits::{GetCommitTool, ListCommitsTool};
pub use files::{
    CreateOrUpdateFileTool, DeleteFileTool, GetFileContentsTool, ListRepoContentsTool,
    PushFilesTool,
};
pub use issues::{CreateIssueCommentTool, CreateIssueTool, GetIssueTool, ListIssuesTool};
pub use pulls::{
    CreatePullRequestTool, GetPullRequestTool, ListPullRequestsTool, MergePullRequestTool,
};
pub use registry::ToolRegistry;
pub use repos::{
    CreateRepositoryTool, ForkRepositoryTool, GetRepositoryTool, ListRepositoriesTool,
};
pub use search::{SearchCodeTool, SearchRepositoriesTool};
pub use tasklog::GetTaskLogsTool;
pub use users::GetUserTool;

/// One operation of the catalog: a schema plus an executor.
///
/// Structural validation against [`Tool::schema`] happens in the dispatcher
/// before `execute` is invoked, so `execute` may assume required fields exist
/// with the declared kinds. The returned value is the operation's normalized
/// output; the dispatcher serializes it into the reply envelope.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn schema(&self) -> &Schema;

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// Failure modes a tool call can surface. The dispatcher folds every variant
/// into an error envelope; nothing here crosses the protocol boundary as a
/// raised error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl From<GithubError> for ToolError {
    fn from(error: GithubError) -> Self {
        ToolError::Upstream(error.to_string())
    }
}

/// Base schema shared by every repository-scoped operation.
pub(crate) fn repo_schema() -> Schema {
    Schema::new()
        .required("owner", FieldKind::String, "Repository owner (user or org)")
        .required("repo", FieldKind::String, "Repository name")
}

/// Decode validated arguments into a tool's typed argument struct.
pub(crate) fn parse_args<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::Validation(ValidationError::new(vec![e.to_string()])))
}
