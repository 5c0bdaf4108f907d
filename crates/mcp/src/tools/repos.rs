// Repository tools: lookup, creation, forking, listing.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use hubcap_github::api::repos::{CreateRepoRequest, ForkRequest, ListReposQuery};
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to fetch repository metadata.
pub struct GetRepositoryTool {
    client: GithubClient,
    schema: Schema,
}

impl GetRepositoryTool {
    pub fn new(client: GithubClient) -> Self {
        Self {
            client,
            schema: repo_schema(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetRepositoryArgs {
    owner: String,
    repo: String,
}

#[async_trait::async_trait]
impl Tool for GetRepositoryTool {
    fn name(&self) -> &'static str {
        "get_repository"
    }

    fn description(&self) -> &'static str {
        "Get details about a GitHub repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetRepositoryArgs = parse_args(arguments)?;

        let r = self.client.repos().get(&args.owner, &args.repo).await?;

        Ok(json!({
            "full_name": r.full_name,
            "description": r.description,
            "private": r.private,
            "default_branch": r.default_branch,
            "language": r.language,
            "stars": r.stargazers_count,
            "forks": r.forks_count,
            "open_issues": r.open_issues_count,
            "created_at": r.created_at,
            "updated_at": r.updated_at,
            "url": r.html_url,
            "clone_url": r.clone_url,
            "topics": r.topics,
        }))
    }
}

/// Tool to create a repository for the authenticated user.
pub struct CreateRepositoryTool {
    client: GithubClient,
    schema: Schema,
}

impl CreateRepositoryTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = Schema::new()
            .required("name", FieldKind::String, "Repository name")
            .optional("description", FieldKind::String, "Repository description")
            .optional(
                "private",
                FieldKind::Boolean,
                "Make the repository private (default: false)",
            )
            .optional(
                "auto_init",
                FieldKind::Boolean,
                "Initialize with a README (default: false)",
            )
            .optional(
                "gitignore_template",
                FieldKind::String,
                "Gitignore template language (e.g. Node)",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreateRepositoryArgs {
    name: String,
    description: Option<String>,
    private: Option<bool>,
    auto_init: Option<bool>,
    gitignore_template: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateRepositoryTool {
    fn name(&self) -> &'static str {
        "create_repository"
    }

    fn description(&self) -> &'static str {
        "Create a new GitHub repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreateRepositoryArgs = parse_args(arguments)?;

        let request = CreateRepoRequest {
            name: args.name,
            description: args.description,
            private: args.private,
            auto_init: args.auto_init,
            gitignore_template: args.gitignore_template,
        };
        let r = self
            .client
            .repos()
            .create_for_authenticated_user(&request)
            .await?;

        Ok(json!({
            "full_name": r.full_name,
            "url": r.html_url,
            "clone_url": r.clone_url,
            "private": r.private,
            "default_branch": r.default_branch,
        }))
    }
}

/// Tool to fork a repository.
pub struct ForkRepositoryTool {
    client: GithubClient,
    schema: Schema,
}

impl ForkRepositoryTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema().optional(
            "organization",
            FieldKind::String,
            "Organization to fork into (default: authenticated user)",
        );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ForkRepositoryArgs {
    owner: String,
    repo: String,
    organization: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ForkRepositoryTool {
    fn name(&self) -> &'static str {
        "fork_repository"
    }

    fn description(&self) -> &'static str {
        "Fork a repository to the authenticated user or an organization"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ForkRepositoryArgs = parse_args(arguments)?;

        let request = ForkRequest {
            organization: args.organization,
        };
        let r = self
            .client
            .repos()
            .create_fork(&args.owner, &args.repo, &request)
            .await?;

        Ok(json!({
            "full_name": r.full_name,
            "url": r.html_url,
            "clone_url": r.clone_url,
        }))
    }
}

/// Tool to list the authenticated user's repositories.
pub struct ListRepositoriesTool {
    client: GithubClient,
    schema: Schema,
}

impl ListRepositoriesTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = Schema::new()
            .optional(
                "type",
                FieldKind::Enum(&["all", "owner", "public", "private", "member"]),
                "Which repositories to list",
            )
            .optional(
                "sort",
                FieldKind::Enum(&["created", "updated", "pushed", "full_name"]),
                "Sort order",
            )
            .optional("per_page", FieldKind::Number, "Repos per page (default 30)")
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListRepositoriesArgs {
    #[serde(rename = "type")]
    kind: Option<String>,
    sort: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListRepositoriesTool {
    fn name(&self) -> &'static str {
        "list_repositories"
    }

    fn description(&self) -> &'static str {
        "List repositories for the authenticated user"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListRepositoriesArgs = parse_args(arguments)?;

        let query = ListReposQuery {
            kind: args.kind,
            sort: args.sort,
            per_page: args.per_page,
            page: args.page,
        };
        let repos = self
            .client
            .repos()
            .list_for_authenticated_user(&query)
            .await?;

        Ok(Value::Array(
            repos
                .into_iter()
                .map(|r| {
                    json!({
                        "full_name": r.full_name,
                        "description": r.description,
                        "private": r.private,
                        "language": r.language,
                        "stars": r.stargazers_count,
                        "url": r.html_url,
                    })
                })
                .collect(),
        ))
    }
}
