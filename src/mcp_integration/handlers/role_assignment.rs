//! Admin role handlers for MCP integration
//!
//! Role assignment is membership of the configured admin dynamic group,
//! reconciled through [`ProvisioningService`](crate::provisioning::ProvisioningService).

use super::required_str;
use super::user_crud::new_user_from_arguments;
use crate::gateway::{GroupGateway, UserDirectory};
use crate::mcp_integration::core::{ProvisioningMcpServer, ToolResult};
use crate::provisioning::StepResult;
use log::info;
use serde_json::{Value, json};

/// Handle adding an existing user to the admin group
///
/// An already-present member is a success with status `already_member`.
pub async fn handle_add_user_to_admin_role<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let user_id = match required_str(&arguments, "user_id") {
        Ok(id) => id,
        Err(result) => return result,
    };
    info!("Tool called: add_user_to_admin_role for {}", user_id);

    let result = server.service.add_user_to_admin_role(user_id).await;
    let group = server.service.admin_group();
    let mut tool_result = ToolResult::from(StepResult::from_reconciliation(&result));
    tool_result.metadata = Some(json!({
        "operation": "add_user_to_admin_role",
        "group_id": group.id(),
        "group_name": group.name()
    }));
    tool_result
}

/// Handle creating a user and adding it to the admin group
pub async fn handle_create_user_with_admin_role<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let user = match new_user_from_arguments(&arguments) {
        Ok(user) => user,
        Err(result) => return result,
    };
    info!("Tool called: create_user_with_admin_role for {}", user.user_id);

    ToolResult::from(server.service.create_user_with_admin_role(&user).await)
        .with_operation("create_user_with_admin_role")
}
