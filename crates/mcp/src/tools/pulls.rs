// Pull request tools.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use hubcap_github::api::pulls::{CreatePullRequest, ListPullsQuery, MergeRequest};
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to list pull requests.
pub struct ListPullRequestsTool {
    client: GithubClient,
    schema: Schema,
}

impl ListPullRequestsTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .optional(
                "state",
                FieldKind::Enum(&["open", "closed", "all"]),
                "PR state (default: open)",
            )
            .optional("per_page", FieldKind::Number, "PRs per page (default 30)")
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListPullRequestsArgs {
    owner: String,
    repo: String,
    state: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListPullRequestsTool {
    fn name(&self) -> &'static str {
        "list_pull_requests"
    }

    fn description(&self) -> &'static str {
        "List pull requests in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListPullRequestsArgs = parse_args(arguments)?;

        let query = ListPullsQuery {
            state: args.state,
            per_page: args.per_page,
            page: args.page,
        };
        let pulls = self
            .client
            .pulls()
            .list(&args.owner, &args.repo, &query)
            .await?;

        Ok(Value::Array(
            pulls
                .into_iter()
                .map(|pr| {
                    json!({
                        "number": pr.number,
                        "title": pr.title,
                        "state": pr.state,
                        "draft": pr.draft,
                        "head": pr.head.reference,
                        "base": pr.base.reference,
                        "author": pr.user.as_ref().map(|u| u.login.clone()),
                        "created_at": pr.created_at,
                        "url": pr.html_url,
                    })
                })
                .collect(),
        ))
    }
}

/// Tool to fetch one pull request.
pub struct GetPullRequestTool {
    client: GithubClient,
    schema: Schema,
}

impl GetPullRequestTool {
    pub fn new(client: GithubClient) -> Self {
        let schema =
            repo_schema().required("pull_number", FieldKind::Number, "Pull request number");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetPullRequestArgs {
    owner: String,
    repo: String,
    pull_number: u64,
}

#[async_trait::async_trait]
impl Tool for GetPullRequestTool {
    fn name(&self) -> &'static str {
        "get_pull_request"
    }

    fn description(&self) -> &'static str {
        "Get details of a specific pull request"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetPullRequestArgs = parse_args(arguments)?;

        let pr = self
            .client
            .pulls()
            .get(&args.owner, &args.repo, args.pull_number)
            .await?;

        Ok(json!({
            "number": pr.number,
            "title": pr.title,
            "state": pr.state,
            "draft": pr.draft,
            "body": pr.body,
            "head": pr.head.reference,
            "base": pr.base.reference,
            "author": pr.user.as_ref().map(|u| u.login.clone()),
            "created_at": pr.created_at,
            "updated_at": pr.updated_at,
            "merged": pr.merged,
            "mergeable": pr.mergeable,
            "url": pr.html_url,
            "additions": pr.additions,
            "deletions": pr.deletions,
            "changed_files": pr.changed_files,
        }))
    }
}

/// Tool to open a pull request.
pub struct CreatePullRequestTool {
    client: GithubClient,
    schema: Schema,
}

impl CreatePullRequestTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("title", FieldKind::String, "PR title")
            .optional("body", FieldKind::String, "PR description")
            .required("head", FieldKind::String, "Branch containing changes")
            .required("base", FieldKind::String, "Branch to merge into")
            .optional("draft", FieldKind::Boolean, "Open as a draft PR");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePullRequestArgs {
    owner: String,
    repo: String,
    title: String,
    body: Option<String>,
    head: String,
    base: String,
    draft: Option<bool>,
}

#[async_trait::async_trait]
impl Tool for CreatePullRequestTool {
    fn name(&self) -> &'static str {
        "create_pull_request"
    }

    fn description(&self) -> &'static str {
        "Create a new pull request"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreatePullRequestArgs = parse_args(arguments)?;

        let request = CreatePullRequest {
            title: args.title,
            body: args.body,
            head: args.head,
            base: args.base,
            draft: args.draft,
        };
        let pr = self
            .client
            .pulls()
            .create(&args.owner, &args.repo, &request)
            .await?;

        Ok(json!({
            "number": pr.number,
            "title": pr.title,
            "url": pr.html_url,
            "state": pr.state,
            "draft": pr.draft,
        }))
    }
}

/// Tool to merge a pull request.
pub struct MergePullRequestTool {
    client: GithubClient,
    schema: Schema,
}

impl MergePullRequestTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("pull_number", FieldKind::Number, "Pull request number")
            .optional("commit_title", FieldKind::String, "Merge commit title")
            .optional("commit_message", FieldKind::String, "Merge commit message")
            .optional(
                "merge_method",
                FieldKind::Enum(&["merge", "squash", "rebase"]),
                "Merge method (default: merge)",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct MergePullRequestArgs {
    owner: String,
    repo: String,
    pull_number: u64,
    commit_title: Option<String>,
    commit_message: Option<String>,
    merge_method: Option<String>,
}

#[async_trait::async_trait]
impl Tool for MergePullRequestTool {
    fn name(&self) -> &'static str {
        "merge_pull_request"
    }

    fn description(&self) -> &'static str {
        "Merge a pull request"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: MergePullRequestArgs = parse_args(arguments)?;

        let request = MergeRequest {
            commit_title: args.commit_title,
            commit_message: args.commit_message,
            merge_method: args.merge_method,
        };
        let result = self
            .client
            .pulls()
            .merge(&args.owner, &args.repo, args.pull_number, &request)
            .await?;

        Ok(json!({
            "sha": result.sha,
            "merged": result.merged,
            "message": result.message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubcap_github::RetryConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GithubClient {
        GithubClient::builder()
            .base_url(server.uri())
            .token("test-token")
            .retry_config(RetryConfig::no_retry())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_pull_requests_projection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls"))
            .and(query_param("state", "closed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "number": 7,
                "title": "Fix the frobnicator",
                "state": "closed",
                "draft": false,
                "head": {"ref": "fix-frob"},
                "base": {"ref": "main"},
                "user": {"login": "ada"},
                "created_at": "2024-04-01T09:00:00Z",
                "html_url": "https://github.com/acme/widgets/pull/7"
            }])))
            .mount(&server)
            .await;

        let tool = ListPullRequestsTool::new(test_client(&server));
        let output = tool
            .execute(json!({"owner": "acme", "repo": "widgets", "state": "closed"}))
            .await
            .unwrap();

        assert_eq!(output[0]["number"], 7);
        assert_eq!(output[0]["head"], "fix-frob");
        assert_eq!(output[0]["author"], "ada");
    }

    #[tokio::test]
    async fn test_create_pull_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/widgets/pulls"))
            .and(body_partial_json(json!({
                "title": "Add feature", "head": "feature-x", "base": "main"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 8,
                "title": "Add feature",
                "state": "open",
                "draft": false,
                "head": {"ref": "feature-x"},
                "base": {"ref": "main"},
                "html_url": "https://github.com/acme/widgets/pull/8"
            })))
            .mount(&server)
            .await;

        let tool = CreatePullRequestTool::new(test_client(&server));
        let output = tool
            .execute(json!({
                "owner": "acme", "repo": "widgets",
                "title": "Add feature", "head": "feature-x", "base": "main"
            }))
            .await
            .unwrap();

        assert_eq!(output["number"], 8);
        assert_eq!(output["state"], "open");
    }

    #[tokio::test]
    async fn test_merge_pull_request() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/repos/acme/widgets/pulls/7/merge"))
            .and(body_partial_json(json!({"merge_method": "squash"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "merge-sha",
                "merged": true,
                "message": "Pull Request successfully merged"
            })))
            .mount(&server)
            .await;

        let tool = MergePullRequestTool::new(test_client(&server));
        let output = tool
            .execute(json!({
                "owner": "acme", "repo": "widgets",
                "pull_number": 7, "merge_method": "squash"
            }))
            .await
            .unwrap();

        assert_eq!(output["sha"], "merge-sha");
        assert_eq!(output["merged"], true);
    }

    #[tokio::test]
    async fn test_merge_method_enum_rejected_by_schema() {
        let server = MockServer::start().await;
        let tool = MergePullRequestTool::new(test_client(&server));

        let error = tool
            .schema()
            .validate(&json!({
                "owner": "acme", "repo": "widgets",
                "pull_number": 7, "merge_method": "fast-forward"
            }))
            .unwrap_err();

        assert!(error.to_string().contains("merge_method"));
    }
}
