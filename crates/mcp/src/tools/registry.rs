// Tool registry and dispatcher.

use crate::protocol::{CallToolResult, ToolDefinition};
use crate::tools::{Tool, ToolError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of the available tools. Built once at startup; read-only after.
///
/// Registration order is preserved so the advertised catalog is stable for
/// the process lifetime.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. A tool registered under an already-taken name
    /// replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        match self.index.get(name) {
            Some(&position) => self.tools[position] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&position| self.tools[position].clone())
    }

    /// The tool catalog, in registration order. Each entry's input schema is
    /// rendered from the same [`crate::schema::Schema`] the dispatcher
    /// validates against.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.schema().input_schema(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Route a call to its tool and fold the outcome into a result envelope.
    ///
    /// This never fails: unknown names, invalid arguments, and execution
    /// errors all come back as an `isError` envelope. Validation runs before
    /// execution, so a call with invalid arguments performs no upstream work.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> CallToolResult {
        let tool = match self.get(name) {
            Some(tool) => tool,
            None => {
                warn!(tool = name, "call to unknown tool");
                return CallToolResult::failure(ToolError::UnknownTool(name.to_string()).to_string());
            }
        };

        let arguments = if arguments.is_null() { json!({}) } else { arguments };

        if let Err(error) = tool.schema().validate(&arguments) {
            debug!(tool = name, %error, "arguments rejected");
            return CallToolResult::failure(ToolError::Validation(error).to_string());
        }

        match tool.execute(arguments).await {
            Ok(output) => match serde_json::to_string_pretty(&output) {
                Ok(text) => CallToolResult::success(text),
                Err(error) => CallToolResult::failure(format!(
                    "failed to serialize tool output: {}",
                    error
                )),
            },
            Err(error) => {
                warn!(tool = name, %error, "tool execution failed");
                CallToolResult::failure(error.to_string())
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, Schema};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stand-in for a real tool that counts how often it reaches upstream.
    struct CountingTool {
        schema: Schema,
        calls: Arc<AtomicUsize>,
    }

    impl CountingTool {
        fn new(calls: Arc<AtomicUsize>) -> Self {
            Self {
                schema: Schema::new().required("owner", FieldKind::String, "Repository owner"),
                calls,
            }
        }
    }

    #[async_trait::async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &'static str {
            "counting_tool"
        }

        fn description(&self) -> &'static str {
            "Counts executions"
        }

        fn schema(&self) -> &Schema {
            &self.schema
        }

        async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"echo": arguments["owner"], "items": [1, 2, 3]}))
        }
    }

    fn registry_with_counter() -> (ToolRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CountingTool::new(calls.clone())));
        (registry, calls)
    }

    #[test]
    fn test_catalog_matches_dispatch_schema() {
        let (registry, _) = registry_with_counter();
        let definitions = registry.definitions();

        assert_eq!(definitions.len(), registry.len());
        for definition in &definitions {
            let tool = registry.get(&definition.name).expect("catalog entry has a handler");
            assert_eq!(definition.input_schema, tool.schema().input_schema());
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_and_server_survives() {
        let (registry, calls) = registry_with_counter();

        let result = registry.dispatch("no_such_tool", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result.content[0].as_text().contains("unknown tool: no_such_tool"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // A subsequent valid call still goes through.
        let result = registry.dispatch("counting_tool", json!({"owner": "acme"})).await;
        assert_eq!(result.is_error, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_upstream_call() {
        let (registry, calls) = registry_with_counter();

        let result = registry.dispatch("counting_tool", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(result.content[0]
            .as_text()
            .contains("owner: missing required field"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let result = registry.dispatch("counting_tool", json!({"owner": 7})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_null_arguments_treated_as_empty() {
        let (registry, calls) = registry_with_counter();

        let result = registry.dispatch("counting_tool", Value::Null).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_round_trips_normalized_output() {
        let (registry, _) = registry_with_counter();

        let result = registry
            .dispatch("counting_tool", json!({"owner": "acme"}))
            .await;
        assert_eq!(result.is_error, None);

        let parsed: Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(parsed, json!({"echo": "acme", "items": [1, 2, 3]}));
    }

    #[test]
    fn test_reregistering_replaces_without_duplicating() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CountingTool::new(calls.clone())));
        registry.register(Arc::new(CountingTool::new(calls)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definitions().len(), 1);
    }
}
