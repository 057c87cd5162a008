//! System tool schema definitions for MCP integration

use serde_json::{Value, json};

/// Schema definition for the connection test tool
///
/// Lists a single user to confirm the credentials and endpoint work.
pub fn test_connection_tool() -> Value {
    json!({
        "name": "test_connection",
        "description": "Test the connection to the SAP SuccessFactors OData API",
        "inputSchema": {
            "type": "object",
            "properties": {}
        }
    })
}

/// Schema definition for server information tool
pub fn server_info_tool() -> Value {
    json!({
        "name": "server_info",
        "description": "Get server information, the configured admin group and the available tools",
        "inputSchema": {
            "type": "object",
            "properties": {}
        }
    })
}
