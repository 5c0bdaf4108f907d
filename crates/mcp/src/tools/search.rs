// Search tools: code and repository search.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, Tool, ToolError};
use hubcap_github::api::search::SearchQuery;
use hubcap_github::GithubClient;
use serde::Deserialize;
use serde_json::{json, Value};

/// Tool to search code. Global: not scoped to one repository.
pub struct SearchCodeTool {
    client: GithubClient,
    schema: Schema,
}

impl SearchCodeTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = Schema::new()
            .required(
                "query",
                FieldKind::String,
                "GitHub code search query (e.g. 'repo:owner/repo filename:index.ts')",
            )
            .optional(
                "per_page",
                FieldKind::Number,
                "Results per page (default 30)",
            )
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct SearchCodeArgs {
    query: String,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for SearchCodeTool {
    fn name(&self) -> &'static str {
        "search_code"
    }

    fn description(&self) -> &'static str {
        "Search for code on GitHub"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: SearchCodeArgs = parse_args(arguments)?;

        let query = SearchQuery {
            q: args.query,
            sort: None,
            per_page: args.per_page,
            page: args.page,
        };
        let results = self.client.search().code(&query).await?;

        Ok(json!({
            "total_count": results.total_count,
            "items": results
                .items
                .into_iter()
                .map(|item| {
                    json!({
                        "name": item.name,
                        "path": item.path,
                        "repository": item.repository.full_name,
                        "url": item.html_url,
                    })
                })
                .collect::<Vec<_>>(),
        }))
    }
}

/// Tool to search repositories.
pub struct SearchRepositoriesTool {
    client: GithubClient,
    schema: Schema,
}

impl SearchRepositoriesTool {
    pub fn new(client: GithubClient) -> Self {
        let schema = Schema::new()
            .required("query", FieldKind::String, "GitHub repository search query")
            .optional(
                "sort",
                FieldKind::Enum(&["stars", "forks", "help-wanted-issues", "updated"]),
                "Sort order",
            )
            .optional(
                "per_page",
                FieldKind::Number,
                "Results per page (default 30)",
            )
            .optional("page", FieldKind::Number, "Page number (default 1)");
        Self { client, schema }
    }
}

#[derive(Debug, Deserialize)]
struct SearchRepositoriesArgs {
    query: String,
    sort: Option<String>,
    per_page: Option<u32>,
    page: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for SearchRepositoriesTool {
    fn name(&self) -> &'static str {
        "search_repositories"
    }

    fn description(&self) -> &'static str {
        "Search GitHub repositories"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: SearchRepositoriesArgs = parse_args(arguments)?;

        let query = SearchQuery {
            q: args.query,
            sort: args.sort,
            per_page: args.per_page,
            page: args.page,
        };
        let results = self.client.search().repositories(&query).await?;

        Ok(json!({
            "total_count": results.total_count,
            "items": results
                .items
                .into_iter()
                .map(|r| {
                    json!({
                        "full_name": r.full_name,
                        "description": r.description,
                        "stars": r.stargazers_count,
                        "language": r.language,
                        "url": r.html_url,
                    })
                })
                .collect::<Vec<_>>(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubcap_github::RetryConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
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
    async fn test_search_code_projection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/code"))
            .and(query_param("q", "repo:acme/widgets frobnicate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "items": [{
                    "name": "frob.rs",
                    "path": "src/frob.rs",
                    "html_url": "https://github.com/acme/widgets/blob/main/src/frob.rs",
                    "repository": {"full_name": "acme/widgets"}
                }]
            })))
            .mount(&server)
            .await;

        let tool = SearchCodeTool::new(test_client(&server));
        let output = tool
            .execute(json!({"query": "repo:acme/widgets frobnicate"}))
            .await
            .unwrap();

        assert_eq!(output["total_count"], 1);
        assert_eq!(output["items"][0]["repository"], "acme/widgets");
        assert_eq!(output["items"][0]["path"], "src/frob.rs");
    }

    #[tokio::test]
    async fn test_search_repositories_projection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "widgets language:rust"))
            .and(query_param("sort", "stars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 2,
                "items": [
                    {"full_name": "acme/widgets", "description": "Widget factory",
                     "private": false, "stargazers_count": 42, "language": "Rust",
                     "html_url": "https://github.com/acme/widgets"},
                    {"full_name": "beta/widgets", "private": false,
                     "stargazers_count": 7, "language": "Rust",
                     "html_url": "https://github.com/beta/widgets"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = SearchRepositoriesTool::new(test_client(&server));
        let output = tool
            .execute(json!({"query": "widgets language:rust", "sort": "stars"}))
            .await
            .unwrap();

        assert_eq!(output["total_count"], 2);
        assert_eq!(output["items"][0]["stars"], 42);
        assert_eq!(output["items"][1]["description"], Value::Null);
    }
}
