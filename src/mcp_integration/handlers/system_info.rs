//! System information handlers for MCP integration

use crate::gateway::{GroupGateway, UserDirectory};
use crate::mcp_integration::core::{ProvisioningMcpServer, ToolResult};
use serde_json::{Value, json};

/// Handle the connection test through MCP
pub async fn handle_test_connection<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    _arguments: Value,
) -> ToolResult {
    let report = server.service.test_connection().await;
    let message = if report.healthy {
        "Connected to the SAP SuccessFactors API".to_string()
    } else {
        format!(
            "Could not connect to the SAP SuccessFactors API: {}",
            report.error.as_deref().unwrap_or("unknown error")
        )
    };

    ToolResult {
        success: report.healthy,
        content: json!({
            "success": report.healthy,
            "message": message,
            "checked_at": report.checked_at,
            "error": report.error
        }),
        metadata: Some(json!({ "operation": "test_connection" })),
    }
}

/// Handle server information retrieval through MCP
pub async fn handle_server_info<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    _arguments: Value,
) -> ToolResult {
    let group = server.service.admin_group();
    let options = server.service.reconciler().options();
    let tools: Vec<Value> = server
        .get_tools()
        .iter()
        .filter_map(|tool| tool.get("name").cloned())
        .collect();

    ToolResult {
        success: true,
        content: json!({
            "success": true,
            "message": format!("{} {}", server.server_info.name, server.server_info.version),
            "name": server.server_info.name,
            "version": server.server_info.version,
            "description": server.server_info.description,
            "admin_group": {
                "id": group.id(),
                "name": group.name()
            },
            "reconciliation": {
                "on_missing_group": options.on_missing_group,
                "serialize_per_group": options.serialize_per_group
            },
            "tools": tools
        }),
        metadata: Some(json!({ "operation": "server_info" })),
    }
}
