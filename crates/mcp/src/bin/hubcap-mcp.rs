// Standalone MCP server binary

use anyhow::{Context, Result};
use hubcap_github::GithubClient;
use hubcap_mcp::server::McpServer;
use hubcap_mcp::tools::*;
use std::sync::Arc;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing. stderr only: stdout is the protocol channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Hubcap MCP server starting...");

    // A missing credential is fatal before any request is served.
    let token = std::env::var("GITHUB_TOKEN")
        .context("GITHUB_TOKEN environment variable is required")?;
    let api_url = std::env::var("GITHUB_API_URL")
        .unwrap_or_else(|_| hubcap_github::DEFAULT_BASE_URL.to_string());
    let task_server_url =
        std::env::var("TASK_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let task_server_url =
        Url::parse(&task_server_url).context("TASK_SERVER_URL is not a valid URL")?;

    let client = GithubClient::builder()
        .base_url(api_url)
        .token(token)
        .build()
        .context("failed to construct GitHub client")?;

    let mut registry = ToolRegistry::new();

    // Files
    registry.register(Arc::new(GetFileContentsTool::new(client.clone())));
    registry.register(Arc::new(CreateOrUpdateFileTool::new(client.clone())));
    registry.register(Arc::new(PushFilesTool::new(client.clone())));
    registry.register(Arc::new(DeleteFileTool::new(client.clone())));
    registry.register(Arc::new(ListRepoContentsTool::new(client.clone())));

    // Commits
    registry.register(Arc::new(ListCommitsTool::new(client.clone())));
    registry.register(Arc::new(GetCommitTool::new(client.clone())));

    // Branches
    registry.register(Arc::new(ListBranchesTool::new(client.clone())));
    registry.register(Arc::new(CreateBranchTool::new(client.clone())));

    // Pull requests
    registry.register(Arc::new(ListPullRequestsTool::new(client.clone())));
    registry.register(Arc::new(GetPullRequestTool::new(client.clone())));
    registry.register(Arc::new(CreatePullRequestTool::new(client.clone())));
    registry.register(Arc::new(MergePullRequestTool::new(client.clone())));

    // Issues
    registry.register(Arc::new(ListIssuesTool::new(client.clone())));
    registry.register(Arc::new(GetIssueTool::new(client.clone())));
    registry.register(Arc::new(CreateIssueTool::new(client.clone())));
    registry.register(Arc::new(CreateIssueCommentTool::new(client.clone())));

    // Repositories
    registry.register(Arc::new(GetRepositoryTool::new(client.clone())));
    registry.register(Arc::new(CreateRepositoryTool::new(client.clone())));
    registry.register(Arc::new(ForkRepositoryTool::new(client.clone())));
    registry.register(Arc::new(ListRepositoriesTool::new(client.clone())));

    // Search
    registry.register(Arc::new(SearchCodeTool::new(client.clone())));
    registry.register(Arc::new(SearchRepositoriesTool::new(client.clone())));

    // Users
    registry.register(Arc::new(GetUserTool::new(client)));

    // Task server sidecar
    registry.register(Arc::new(GetTaskLogsTool::new(task_server_url)));

    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await
}
