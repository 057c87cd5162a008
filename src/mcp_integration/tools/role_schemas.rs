//! Admin role tool schema definitions for MCP integration
//!
//! Both tools reconcile membership of the configured admin dynamic group.
//! Adding a user who is already a member succeeds without changing the group.

use super::user_schemas::new_user_properties;
use serde_json::{Value, json};

/// Schema definition for adding an existing user to the admin group
pub fn add_user_to_admin_role_tool() -> Value {
    json!({
        "name": "add_user_to_admin_role",
        "description": "Add an existing user to the admin permission group",
        "inputSchema": {
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "ID of the user to add"
                }
            },
            "required": ["user_id"]
        }
    })
}

/// Schema definition for creating a user and adding it to the admin group
///
/// If creation fails the group is not touched. If creation succeeds but the
/// group update fails, the result reports the user as created.
pub fn create_user_with_admin_role_tool() -> Value {
    json!({
        "name": "create_user_with_admin_role",
        "description": "Create a new user, then add it to the admin permission group",
        "inputSchema": {
            "type": "object",
            "properties": new_user_properties(),
            "required": ["user_id", "username"]
        }
    })
}
