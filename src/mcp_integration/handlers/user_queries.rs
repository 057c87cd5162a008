//! User query handlers for MCP integration

use super::{optional_str, optional_u32};
use crate::gateway::{GroupGateway, UserDirectory};
use crate::mcp_integration::core::{ProvisioningMcpServer, ToolResult};
use crate::users::{DEFAULT_PAGE_SIZE, UserQuery};
use serde_json::Value;

/// Handle user listing through MCP
///
/// `top` defaults to 10 and `skip` to 0. `filter_query` is passed to the
/// service as the OData `$filter` expression unchanged.
pub async fn handle_list_users<G: GroupGateway + UserDirectory>(
    server: &ProvisioningMcpServer<G>,
    arguments: Value,
) -> ToolResult {
    let top = match optional_u32(&arguments, "top", DEFAULT_PAGE_SIZE) {
        Ok(top) => top,
        Err(result) => return result,
    };
    let skip = match optional_u32(&arguments, "skip", 0) {
        Ok(skip) => skip,
        Err(result) => return result,
    };

    let mut query = UserQuery::new().with_top(top).with_skip(skip);
    if let Some(filter) = optional_str(&arguments, "filter_query") {
        query = query.with_filter(filter);
    }

    ToolResult::from(server.service.list_users(&query).await).with_operation("list_users")
}
