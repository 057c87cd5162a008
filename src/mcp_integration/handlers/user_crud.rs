//! User CRUD operation handlers for MCP integration

use super::{optional_str, required_str};
use crate::gateway::{GroupGateway, UserDirectory};
use crate::mcp_integration::core::{ProvisioningMcpServer, ToolResult};
use crate::users::{NewUser, UserUpdate};
use serde_json::Value;

/// Build a [`NewUser`] from tool arguments.
pub(crate) fn new_user_from_arguments(arguments: &Value) -> Result<NewUser, ToolResult> {
    let user_id = required_str(arguments, "user_id")?;
    let username = required_str(arguments, "username")?;

    let mut user = NewUser::new(user_id, username);
    if let Some(first_name) = optional_str(arguments, "first_name") {
        user = user.with_first_name(first_name);
    }
    if let Some(last_name) = optional_str(arguments, "last_name") {
        user = user.with_last_name(last_name);
    }
    if let Some(email) = optional_str(arguments, "email") {
        user = user.with_email(email);
    }
    if let Some(locale) = optional_str(arguments, "locale") {
        user = user.with_locale(locale);
    }
    if let Some(timezone) = optional_str(arguments, "timezone") {
        user = user.with_timezone(timezone);
    }
    Ok(user)
}

/// Handle user creation through MCP
///
/// # Errors
///
/// Returns error result if:
/// - `user_id` or `username` is missing
/// - The user already exists or the service rejects the payload
pub async fn handle_create_user<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let user = match new_user_from_arguments(&arguments) {
        Ok(user) => user,
        Err(result) => return result,
    };

    ToolResult::from(server.service.create_user(&user).await).with_operation("create_user")
}

/// Handle user retrieval through MCP
pub async fn handle_get_user<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let user_id = match required_str(&arguments, "user_id") {
        Ok(id) => id,
        Err(result) => return result,
    };

    ToolResult::from(server.service.get_user(user_id).await).with_operation("get_user")
}

/// Handle user update through MCP
///
/// Blank fields are ignored. If nothing is left to update, the call fails
/// without contacting the service.
pub async fn handle_update_user<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let user_id = match required_str(&arguments, "user_id") {
        Ok(id) => id,
        Err(result) => return result,
    };

    let mut update = UserUpdate::new();
    if let Some(value) = optional_str(&arguments, "first_name") {
        update = update.with_first_name(value);
    }
    if let Some(value) = optional_str(&arguments, "last_name") {
        update = update.with_last_name(value);
    }
    if let Some(value) = optional_str(&arguments, "email") {
        update = update.with_email(value);
    }
    if let Some(value) = optional_str(&arguments, "locale") {
        update = update.with_locale(value);
    }
    if let Some(value) = optional_str(&arguments, "timezone") {
        update = update.with_timezone(value);
    }

    ToolResult::from(server.service.update_user(user_id, &update).await)
        .with_operation("update_user")
}
