// Issue tools.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use hubcap_github::api::issues::{CreateIssueRequest, ListIssuesQuery, NewComment};
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to list issues.
pub struct ListIssuesTool {
    client: GithubClient,
    schema: Schema,
}

impl ListIssuesTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .optional(
                "state",
                FieldKind::Enum(&["open", "closed", "all"]),
                "Issue state (default: open)",
            )
            .optional(
                "labels",
                FieldKind::String,
                "Comma-separated list of label names",
            )
            .optional(
                "per_page",
                FieldKind::Number,
                "Issues per page (default 30)",
            )
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListIssuesArgs {
    owner: String,
    repo: String,
    state: Option<String>,
    labels: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListIssuesTool {
    fn name(&self) -> &'static str {
        "list_issues"
    }

    fn description(&self) -> &'static str {
        "List issues in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListIssuesArgs = parse_args(arguments)?;

        let query = ListIssuesQuery {
            state: args.state,
            labels: args.labels,
            per_page: args.per_page,
            page: args.page,
        };
        let issues = self
            .client
            .issues()
            .list(&args.owner, &args.repo, &query)
            .await?;

        // The issues listing also returns pull requests; drop them.
        Ok(Value::Array(
            issues
                .into_iter()
                .filter(|issue| issue.pull_request.is_none())
                .map(|issue| {
                    json!({
                        "number": issue.number,
                        "title": issue.title,
                        "state": issue.state,
                        "author": issue.user.as_ref().map(|u| u.login.clone()),
                        "labels": issue
                            .labels
                            .iter()
                            .map(|l| l.name().map(str::to_string))
                            .collect::<Vec<_>>(),
                        "created_at": issue.created_at,
                        "url": issue.html_url,
                    })
                })
                .collect(),
        ))
    }
}

/// Tool to fetch one issue.
pub struct GetIssueTool {
    client: GithubClient,
    schema: Schema,
}

impl GetIssueTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema().required("issue_number", FieldKind::Number, "Issue number");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetIssueArgs {
    owner: String,
    repo: String,
    issue_number: u64,
}

#[async_trait::async_trait]
impl Tool for GetIssueTool {
    fn name(&self) -> &'static str {
        "get_issue"
    }

    fn description(&self) -> &'static str {
        "Get details of a specific issue"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetIssueArgs = parse_args(arguments)?;

        let issue = self
            .client
            .issues()
            .get(&args.owner, &args.repo, args.issue_number)
            .await?;

        Ok(json!({
            "number": issue.number,
            "title": issue.title,
            "state": issue.state,
            "body": issue.body,
            "author": issue.user.as_ref().map(|u| u.login.clone()),
            "labels": issue
                .labels
                .iter()
                .map(|l| l.name().map(str::to_string))
                .collect::<Vec<_>>(),
            "assignees": issue
                .assignees
                .as_ref()
                .map(|list| list.iter().map(|a| a.login.clone()).collect::<Vec<_>>()),
            "created_at": issue.created_at,
            "updated_at": issue.updated_at,
            "url": issue.html_url,
        }))
    }
}

/// Tool to open an issue.
pub struct CreateIssueTool {
    client: GithubClient,
    schema: Schema,
}

impl CreateIssueTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("title", FieldKind::String, "Issue title")
            .optional("body", FieldKind::String, "Issue body")
            .optional(
                "labels",
                FieldKind::Array(Box::new(FieldKind::String)),
                "Labels to apply",
            )
            .optional(
                "assignees",
                FieldKind::Array(Box::new(FieldKind::String)),
                "Usernames to assign",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueArgs {
    owner: String,
    repo: String,
    title: String,
    body: Option<String>,
    labels: Option<Vec<String>>,
    assignees: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl Tool for CreateIssueTool {
    fn name(&self) -> &'static str {
        "create_issue"
    }

    fn description(&self) -> &'static str {
        "Create a new issue in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreateIssueArgs = parse_args(arguments)?;

        let request = CreateIssueRequest {
            title: args.title,
            body: args.body,
            labels: args.labels,
            assignees: args.assignees,
        };
        let issue = self
            .client
            .issues()
            .create(&args.owner, &args.repo, &request)
            .await?;

        Ok(json!({
            "number": issue.number,
            "title": issue.title,
            "url": issue.html_url,
            "state": issue.state,
        }))
    }
}

/// Tool to comment on an issue or pull request.
pub struct CreateIssueCommentTool {
    client: GithubClient,
    schema: Schema,
}

impl CreateIssueCommentTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("issue_number", FieldKind::Number, "Issue or PR number")
            .required("body", FieldKind::String, "Comment body");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueCommentArgs {
    owner: String,
    repo: String,
    issue_number: u64,
    body: String,
}

#[async_trait::async_trait]
impl Tool for CreateIssueCommentTool {
    fn name(&self) -> &'static str {
        "create_issue_comment"
    }

    fn description(&self) -> &'static str {
        "Add a comment to an issue or pull request"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreateIssueCommentArgs = parse_args(arguments)?;

        let comment = self
            .client
            .issues()
            .create_comment(
                &args.owner,
                &args.repo,
                args.issue_number,
                &NewComment { body: args.body },
            )
            .await?;

        Ok(json!({
            "id": comment.id,
            "url": comment.html_url,
            "created_at": comment.created_at,
        }))
    }
}
