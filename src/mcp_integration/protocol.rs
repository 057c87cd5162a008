//! MCP protocol layer for tool discovery and dispatch
//!
//! Implements the JSON-RPC 2.0 subset used by MCP clients over stdio: one
//! request per line on stdin, one response per line on stdout. Logging goes
//! to stderr so stdout only ever carries protocol frames.

use super::core::{ProvisioningMcpServer, ToolResult};
use super::handlers::{role_assignment, system_info, user_crud, user_queries};
use super::tools::{role_schemas, system_schemas, user_schemas};
use crate::gateway::{GroupGateway, UserDirectory};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// MCP protocol revision announced during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const TOOL_NOT_FOUND: i64 = -32000;
}

/// Incoming JSON-RPC message.
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// Absent for notifications.
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl McpResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(json!({ "code": code, "message": message })),
        }
    }
}

impl<G: GroupGateway + UserDirectory> ProvisioningMcpServer<G> {
    /// Get the list of available MCP tools as JSON
    pub fn get_tools(&self) -> Vec<Value> {
        vec![
            user_schemas::create_user_tool(),
            user_schemas::get_user_tool(),
            user_schemas::update_user_tool(),
            user_schemas::list_users_tool(),
            system_schemas::test_connection_tool(),
            role_schemas::add_user_to_admin_role_tool(),
            role_schemas::create_user_with_admin_role_tool(),
            system_schemas::server_info_tool(),
        ]
    }

    /// Execute a tool by name with arguments
    ///
    /// Unknown tool names produce a failed [`ToolResult`].
    pub async fn execute_tool(&self, tool_name: &str, arguments: Value) -> ToolResult {
        debug!("Executing MCP tool: {} with args: {}", tool_name, arguments);

        match tool_name {
            // User operations
            "create_user" => user_crud::handle_create_user(self, arguments).await,
            "get_user" => user_crud::handle_get_user(self, arguments).await,
            "update_user" => user_crud::handle_update_user(self, arguments).await,
            "list_users" => user_queries::handle_list_users(self, arguments).await,

            // Admin role operations
            "add_user_to_admin_role" => {
                role_assignment::handle_add_user_to_admin_role(self, arguments).await
            }
            "create_user_with_admin_role" => {
                role_assignment::handle_create_user_with_admin_role(self, arguments).await
            }

            // System operations
            "test_connection" => system_info::handle_test_connection(self, arguments).await,
            "server_info" => system_info::handle_server_info(self, arguments).await,

            _ => ToolResult {
                success: false,
                content: json!({
                    "success": false,
                    "message": format!("Unknown tool: {tool_name}"),
                    "tool_name": tool_name
                }),
                metadata: None,
            },
        }
    }

    fn has_tool(&self, tool_name: &str) -> bool {
        self.get_tools()
            .iter()
            .any(|tool| tool.get("name").and_then(Value::as_str) == Some(tool_name))
    }

    /// Handle one line of JSON-RPC input.
    ///
    /// Returns `None` for notifications, which get no response.
    pub async fn handle_mcp_request(&self, line: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to parse MCP request: {}", e);
                return Some(McpResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    "Parse error",
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            debug!("Received notification: {}", request.method);
            return None;
        };
        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                "Invalid Request",
            ));
        }

        debug!("Handling MCP method: {}", request.method);
        let response = match request.method.as_str() {
            "initialize" => McpResponse::success(id, self.initialize_result()),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => McpResponse::success(id, json!({ "tools": self.get_tools() })),
            "tools/call" => self.handle_tools_call(id, &request.params).await,
            _ => McpResponse::error(id, error_codes::METHOD_NOT_FOUND, "Method not found"),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        })
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> McpResponse {
        let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
            return McpResponse::error(id, error_codes::INVALID_PARAMS, "Missing tool name");
        };
        if !self.has_tool(tool_name) {
            return McpResponse::error(id, error_codes::TOOL_NOT_FOUND, "Unknown tool");
        }

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments.clone(),
        };
        let result = self.execute_tool(tool_name, arguments).await;
        let text = serde_json::to_string_pretty(&result.content)
            .unwrap_or_else(|_| result.content.to_string());

        McpResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text }],
                "isError": !result.success
            }),
        )
    }

    /// Serve JSON-RPC lines from `reader`, writing responses to `writer`,
    /// until end of input.
    pub async fn serve<R, W>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_mcp_request(&line).await {
                let mut frame = serde_json::to_string(&response)?;
                frame.push('\n');
                writer.write_all(frame.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    /// Run the MCP server over stdin/stdout until EOF.
    pub async fn run_stdio(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("{} ready for stdio communication", self.server_info.name);
        info!(
            "Available tools: {:?}",
            self.get_tools()
                .iter()
                .filter_map(|t| t.get("name").and_then(Value::as_str).map(str::to_string))
                .collect::<Vec<_>>()
        );

        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("Stdin closed, shutting down");
        Ok(())
    }
}
