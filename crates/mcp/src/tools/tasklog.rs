// Task-server sidecar tool: read-only access to its log endpoint.

use crate::schema::{FieldKind, Schema};
use crate::tools::{parse_args, Tool, ToolError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// One parsed log line as served by the task server, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogEntry {
    timestamp: String,
    level: String,
    message: String,
}

/// Tool to query the task server's logs.
///
/// Filtering happens on the task server: `from`/`to` bound by timestamp and
/// `last` keeps the trailing N entries of the already-filtered sequence.
pub struct GetTaskLogsTool {
    base_url: Url,
    schema: Schema,
}

impl GetTaskLogsTool {
    pub fn new(base_url: Url) -> Self {
        let schema = Schema::new()
            .optional(
                "last",
                FieldKind::Number,
                "Return only the last N log entries",
            )
            .optional(
                "from",
                FieldKind::Number,
                "Return log entries starting at this UTC milliseconds timestamp",
            )
            .optional(
                "to",
                FieldKind::Number,
                "Return log entries up to this UTC milliseconds timestamp",
            );
        Self { base_url, schema }
    }
}

#[derive(Debug, Deserialize)]
struct GetTaskLogsArgs {
    last: Option<u64>,
    from: Option<u64>,
    to: Option<u64>,
}

#[async_trait::async_trait]
impl Tool for GetTaskLogsTool {
    fn name(&self) -> &'static str {
        "get_task_logs"
    }

    fn description(&self) -> &'static str {
        "Get logs from the task management server"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: GetTaskLogsArgs = parse_args(arguments)?;

        let mut url = self
            .base_url
            .join("/api/logs")
            .map_err(|e| ToolError::Upstream(format!("invalid task server URL: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(last) = args.last {
                pairs.append_pair("last", &last.to_string());
            }
            if let Some(from) = args.from {
                pairs.append_pair("from", &from.to_string());
            }
            if let Some(to) = args.to {
                pairs.append_pair("to", &to.to_string());
            }
        }

        let client = reqwest::Client::builder()
            .user_agent(format!("hubcap/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ToolError::Upstream(format!("failed to create HTTP client: {}", e)))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Upstream(format!("task server request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Upstream(format!(
                "task server returned {}",
                status
            )));
        }

        let entries: Vec<LogEntry> = response
            .json()
            .await
            .map_err(|e| ToolError::Shape(format!("unexpected log payload: {}", e)))?;

        serde_json::to_value(&entries)
            .map_err(|e| ToolError::Shape(format!("failed to re-serialize log entries: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_task_logs_passes_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/logs"))
            .and(query_param("last", "2"))
            .and(query_param("from", "1714550400000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"timestamp": "2024-05-01 10:00:01", "level": "info", "message": "task created"},
                {"timestamp": "2024-05-01 10:00:05", "level": "error", "message": "task failed"}
            ])))
            .mount(&server)
            .await;

        let tool = GetTaskLogsTool::new(Url::parse(&server.uri()).unwrap());
        let output = tool
            .execute(json!({"last": 2, "from": 1714550400000u64}))
            .await
            .unwrap();

        let entries = output.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["level"], "info");
        assert_eq!(entries[1]["message"], "task failed");
    }

    #[tokio::test]
    async fn test_get_task_logs_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/logs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to read logs"
            })))
            .mount(&server)
            .await;

        let tool = GetTaskLogsTool::new(Url::parse(&server.uri()).unwrap());
        let error = tool.execute(json!({})).await.unwrap_err();

        assert!(matches!(error, ToolError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_get_task_logs_rejects_malformed_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
            .mount(&server)
            .await;

        let tool = GetTaskLogsTool::new(Url::parse(&server.uri()).unwrap());
        let error = tool.execute(json!({})).await.unwrap_err();

        assert!(matches!(error, ToolError::Shape(_)));
    }
}
