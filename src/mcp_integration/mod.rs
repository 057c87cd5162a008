//! MCP (Model Context Protocol) integration
//!
//! Exposes the provisioning operations as tools for MCP clients.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌──────────────────────┐
//! │   MCP client    │───▶│  MCP Protocol    │───▶│ ProvisioningService  │
//! │   (stdio)       │    │  (This Module)   │    │ (CRUD + reconciler)  │
//! └─────────────────┘    └──────────────────┘    └──────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - `core` - server metadata, [`ToolResult`] and [`ProvisioningMcpServer`]
//! - `protocol` - JSON-RPC handling, tool discovery and dispatch
//! - `tools/` - JSON schema definitions returned from `tools/list`
//! - `handlers/` - tool execution handlers
//!
//! ## Usage Example
//!
//! ```rust
//! use sf_provisioning::config::ReconcilerOptions;
//! use sf_provisioning::gateway::InMemoryGateway;
//! use sf_provisioning::mcp_integration::ProvisioningMcpServer;
//! use sf_provisioning::membership::{GroupId, GroupTarget};
//! use sf_provisioning::provisioning::ProvisioningService;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let admin = GroupTarget::new(GroupId::new("4521")?, "Admins")?;
//! gateway.seed_group_members(admin.id(), admin.name(), &[]).await?;
//!
//! let service = ProvisioningService::with_admin_group(gateway, admin, ReconcilerOptions::default());
//! let mcp_server = ProvisioningMcpServer::new(service);
//!
//! let result = mcp_server
//!     .execute_tool(
//!         "create_user_with_admin_role",
//!         json!({ "user_id": "NEW001", "username": "newuser" }),
//!     )
//!     .await;
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod handlers;
pub mod protocol;
pub mod tools;


pub use core::{McpServerInfo, ProvisioningMcpServer, ToolResult};
pub use protocol::{McpRequest, McpResponse, PROTOCOL_VERSION};
