// Branch tools: listing and creation.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, repo_schema, Tool, ToolError};
use hubcap_github::api::git::NewRef;
use hubcap_github::api::repos::PageQuery;
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to list branches.
pub struct ListBranchesTool {
    client: GithubClient,
    schema: Schema,
}

impl ListBranchesTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .optional(
                "per_page",
                FieldKind::Number,
                "Branches per page (default 30)",
            )
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct ListBranchesArgs {
    owner: String,
    repo: String,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListBranchesTool {
    fn name(&self) -> &'static str {
        "list_branches"
    }

    fn description(&self) -> &'static str {
        "List branches in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: ListBranchesArgs = parse_args(arguments)?;

        let query = PageQuery {
            per_page: args.per_page,
            page: args.page,
        };
        let branches = self
            .client
            .repos()
            .list_branches(&args.owner, &args.repo, &query)
            .await?;

        Ok(Value::Array(
            branches
                .into_iter()
                .map(|b| {
                    json!({
                        "name": b.name,
                        "sha": b.commit.sha,
                        "protected": b.protected,
                    })
                })
                .collect(),
        ))
    }
}

/// Tool to create a branch from an existing one.
pub struct CreateBranchTool {
    client: GithubClient,
    schema: Schema,
}

impl CreateBranchTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = repo_schema()
            .required("branch", FieldKind::String, "New branch name")
            .optional(
                "from_branch",
                FieldKind::String,
                "Source branch (default: repo default branch)",
            );
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct CreateBranchArgs {
    owner: String,
    repo: String,
    branch: String,
    from_branch: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateBranchTool {
    fn name(&self) -> &'static str {
        "create_branch"
    }

    fn description(&self) -> &'static str {
        "Create a new branch in a repository"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CreateBranchArgs = parse_args(arguments)?;

        // Resolve the source head first; without an explicit source that
        // means an extra hop through the repository's default branch.
        let sha = match &args.from_branch {
            Some(from_branch) => {
                self.client
                    .repos()
                    .get_branch(&args.owner, &args.repo, from_branch)
                    .await?
                    .commit
                    .sha
            }
            None => {
                let repository = self.client.repos().get(&args.owner, &args.repo).await?;
                let default_branch = repository.default_branch.ok_or_else(|| {
                    ToolError::Shape("repository response missing default_branch".to_string())
                })?;
                self.client
                    .repos()
                    .get_branch(&args.owner, &args.repo, &default_branch)
                    .await?
                    .commit
                    .sha
            }
        };

        let reference = self
            .client
            .git()
            .create_ref(
                &args.owner,
                &args.repo,
                &NewRef {
                    reference: format!("refs/heads/{}", args.branch),
                    sha,
                },
            )
            .await?;

        Ok(json!({
            "ref": reference.reference,
            "sha": reference.object.sha,
            "url": reference.url,
        }))
    }
}
