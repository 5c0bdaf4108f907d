// MCP server: JSON-RPC 2.0 over line-delimited stdio.
//
// stdout carries protocol frames only; logging goes to stderr. Tool calls are
// spawned so a slow upstream call never blocks the read loop, and a single
// writer task serializes the replies.

use crate::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use futures_util::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    fn server_info() -> ServerInfo {
        ServerInfo {
            name: "hubcap-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Handle one request. Notifications yield no response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: Self::server_info(),
                },
            ),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.definitions(),
                },
            ),
            "tools/call" => {
                let params: CallToolParams = match request.params {
                    Some(params) => match serde_json::from_value(params) {
                        Ok(params) => params,
                        Err(e) => {
                            return Some(JsonRpcResponse::error(
                                id,
                                JsonRpcError::invalid_params(format!(
                                    "invalid tools/call params: {}",
                                    e
                                )),
                            ))
                        }
                    },
                    None => {
                        return Some(JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params("missing tools/call params"),
                        ))
                    }
                };
                debug!(tool = %params.name, "tool call");
                let result = self.registry.dispatch(&params.name, params.arguments).await;
                JsonRpcResponse::success(id, result)
            }
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };

        Some(response)
    }

    /// Run the stdio loop until the transport closes.
    pub async fn start(&self) -> Result<()> {
        info!("MCP server ready on stdio");

        let mut lines = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
        let (tx, mut rx) = mpsc::channel::<String>(64);

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                if stdout.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if stdout.write_all(b"\n").await.is_err() {
                    break;
                }
                if stdout.flush().await.is_err() {
                    break;
                }
            }
        });

        while let Some(line) = lines.next().await {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(request) => request,
                Err(e) => {
                    warn!(%e, "failed to parse request line");
                    let response =
                        JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error());
                    send_response(&tx, &response).await;
                    continue;
                }
            };

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle(request).await {
                    send_response(&tx, &response).await;
                }
            });
        }

        drop(tx);
        let _ = writer.await;
        info!("stdin closed, shutting down");
        Ok(())
    }
}

async fn send_response(tx: &mpsc::Sender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if tx.send(line).await.is_err() {
                error!("response writer closed");
            }
        }
        Err(e) => error!(%e, "failed to serialize response"),
    }
}
