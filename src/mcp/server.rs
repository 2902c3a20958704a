//! MCP server implementation.

use super::handlers::dispatch;
use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::context::AppContext;
use crate::error::ArrlinkError;
use crate::format::format_response;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "arrlink";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server for Arrlink.
pub struct McpServer {
    settings: Settings,
    context: Option<AppContext>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            context: None,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("Arrlink MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" => {
                // Notification, no response needed but we'll send empty success
                JsonRpcResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&mut self, id: Option<Value>) -> JsonRpcResponse {
        self.context = Some(AppContext::new(&self.settings));
        eprintln!("Backend clients initialized");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let context = match &self.context {
            Some(ctx) => ctx,
            None => {
                let result = ToolCallResult::error("Server not initialized".to_string());
                return JsonRpcResponse::success(id, serde_json::to_value(result).unwrap());
            }
        };

        let args = params.arguments.unwrap_or_else(|| json!({}));
        let result = match dispatch(context, &params.name, &args).await {
            Ok(value) => ToolCallResult::text(format_response(&value, &params.name)),
            Err(e) => ToolCallResult::error(render_error(&e)),
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }
}

/// Render an error as a short human-readable message, never a trace.
fn render_error(error: &ArrlinkError) -> String {
    format!("Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uninitialized_server_rejects_tool_calls() {
        let mut server = McpServer::new(Settings::default());
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "tools/call".to_string(),
            params: Some(json!({"name": "get_radarr_movies", "arguments": {}})),
        };
        let response = server.handle_request(request).await;
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let mut server = McpServer::new(Settings::default());
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "initialize".to_string(),
            params: None,
        };
        let response = server.handle_request(request).await;
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["result"]["serverInfo"]["name"], "arrlink");
        assert_eq!(encoded["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let mut server = McpServer::new(Settings::default());
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(2)),
            method: "resources/list".to_string(),
            params: None,
        };
        let response = server.handle_request(request).await;
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_tools_list_after_initialize() {
        let mut server = McpServer::new(Settings::default());
        let init = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "initialize".to_string(),
            params: None,
        };
        server.handle_request(init).await;

        let list = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(2)),
            method: "tools/list".to_string(),
            params: None,
        };
        let response = server.handle_request(list).await;
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["result"]["tools"].as_array().unwrap().len(), 28);
    }

    #[tokio::test]
    async fn test_invalid_argument_renders_short_message() {
        let mut server = McpServer::new(Settings::default());
        let init = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: "initialize".to_string(),
            params: None,
        };
        server.handle_request(init).await;

        let call = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(2)),
            method: "tools/call".to_string(),
            params: Some(json!({"name": "search_radarr_movies", "arguments": {}})),
        };
        let response = server.handle_request(call).await;
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["result"]["isError"], true);
        assert_eq!(
            encoded["result"]["content"][0]["text"],
            "Error: Invalid argument: missing or malformed 'term'"
        );
    }
}
