// Commit tools: listing and single-commit detail.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use hubcap_github::api::repos::ListCommitsQuery;
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to list commits on a branch.
pub struct ListCommitsTool {
    client: GithubClient,
    schema: Schema,
}

impl ListCommitsTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .optional(
                "branch",
                FieldKind::String,
                "Branch name (default: repo default branch)",
            )
            .optional(
                "per_page",
                FieldKind::Number,
                "Commits per page (max 100, default 30)",
            )
            .optional("page", FieldKind::Number, "Page number (default 1)")
            .optional("path", FieldKind::String, "Only commits touching this path")
            .optional(
                "author",
                FieldKind::String,
                "GitHub username or email to filter by",
            )
            .optional(
                "since",
                FieldKind::String,
                "ISO 8601 date, only commits after this date",
            )
            .optional(
                "until",
                FieldKind::String,
                "ISO 8601 date, only commits before this date",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListCommitsArgs {
    owner: String,
    repo: String,
    branch: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
    path: Option<String>,
    author: Option<String>,
    since: Option<String>,
    until: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListCommitsTool {
    fn name(&self) -> &'static str {
        "list_commits"
    }

    fn description(&self) -> &'static str {
        "List commits on a repository branch"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListCommitsArgs = parse_args(arguments)?;

        let query = ListCommitsQuery {
            sha: args.branch,
            per_page: args.per_page,
            page: args.page,
            path: args.path,
            author: args.author,
            since: args.since,
            until: args.until,
        };
        let commits = self
            .client
            .repos()
            .list_commits(&args.owner, &args.repo, &query)
            .await?;

        Ok(Value::Array(
            commits
                .into_iter()
                .map(|c| {
                    json!({
                        "sha": c.sha,
                        "message": c.commit.message,
                        "author": c.commit.author.as_ref().and_then(|a| a.name.clone()),
                        "date": c.commit.author.as_ref().and_then(|a| a.date),
                        "url": c.html_url,
                    })
                })
                .collect(),
        ))
    }
}

/// Tool to fetch one commit with its changed files.
pub struct GetCommitTool {
    client: GithubClient,
    schema: Schema,
}

impl GetCommitTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema().required("sha", FieldKind::String, "Commit SHA");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetCommitArgs {
    owner: String,
    repo: String,
    sha: String,
}

#[async_trait::async_trait]
impl Tool for GetCommitTool {
    fn name(&self) -> &'static str {
        "get_commit"
    }

    fn description(&self) -> &'static str {
        "Get details of a specific commit including changed files"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetCommitArgs = parse_args(arguments)?;

        let c = self
            .client
            .repos()
            .get_commit(&args.owner, &args.repo, &args.sha)
            .await?;

        Ok(json!({
            "sha": c.sha,
            "message": c.commit.message,
            "author": c.commit.author.as_ref().and_then(|a| a.name.clone()),
            "date": c.commit.author.as_ref().and_then(|a| a.date),
            "url": c.html_url,
            "stats": c.stats,
            "files": c.files,
        }))
    }
}
