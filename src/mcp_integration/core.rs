//! Core MCP integration types
//!
//! Server metadata, the tool result record and the server wrapper that the
//! protocol and handler modules build on.

use crate::config::ProvisioningConfig;
use crate::gateway::{GroupGateway, UserDirectory};
use crate::provisioning::{ComposedOutcome, ProvisioningService, StepResult};
use serde_json::{Value, json};

/// Information about the MCP server for client discovery
///
/// # Examples
///
/// ```rust
/// use sf_provisioning::mcp_integration::McpServerInfo;
///
/// let server_info = McpServerInfo {
///     name: "HR Provisioning".to_string(),
///     version: "1.0.0".to_string(),
///     description: "User provisioning for the HR tenant".to_string(),
/// };
/// assert_eq!(server_info.name, "HR Provisioning");
/// ```
#[derive(Debug, Clone)]
pub struct McpServerInfo {
    /// Human-readable server name
    pub name: String,
    /// Server implementation version
    pub version: String,
    pub description: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: crate::config::DEFAULT_SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "User provisioning and admin group membership for SAP SuccessFactors"
                .to_string(),
        }
    }
}

/// Tool execution result for MCP clients
///
/// `content` always carries a `success` flag and a `message`, so it can be
/// shown to a user as-is.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the tool execution was successful
    pub success: bool,
    /// The main result content
    pub content: Value,
    /// Optional metadata about the operation
    pub metadata: Option<Value>,
}

impl ToolResult {
    /// Failure caused by unusable tool arguments.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            content: json!({
                "success": false,
                "message": message,
                "error": { "kind": "validation", "detail": message }
            }),
            metadata: None,
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.metadata = Some(json!({ "operation": operation }));
        self
    }
}

impl From<StepResult> for ToolResult {
    fn from(step: StepResult) -> Self {
        Self {
            success: step.success,
            content: serde_json::to_value(&step).unwrap_or_else(|e| {
                json!({ "success": false, "message": format!("Failed to render result: {e}") })
            }),
            metadata: None,
        }
    }
}

impl From<ComposedOutcome> for ToolResult {
    fn from(outcome: ComposedOutcome) -> Self {
        Self {
            success: outcome.success,
            content: serde_json::to_value(&outcome).unwrap_or_else(|e| {
                json!({ "success": false, "message": format!("Failed to render result: {e}") })
            }),
            metadata: None,
        }
    }
}

/// MCP server exposing provisioning operations as tools
///
/// # Examples
///
/// ```rust
/// use sf_provisioning::config::ReconcilerOptions;
/// use sf_provisioning::gateway::InMemoryGateway;
/// use sf_provisioning::mcp_integration::ProvisioningMcpServer;
/// use sf_provisioning::membership::{GroupId, GroupTarget};
/// use sf_provisioning::provisioning::ProvisioningService;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let admin = GroupTarget::new(GroupId::new("4521")?, "Admins")?;
/// let service = ProvisioningService::with_admin_group(
///     InMemoryGateway::new(),
///     admin,
///     ReconcilerOptions::default(),
/// );
/// let mcp_server = ProvisioningMcpServer::new(service);
/// assert_eq!(mcp_server.get_tools().len(), 8);
/// # Ok(())
/// # }
/// ```
pub struct ProvisioningMcpServer<G: GroupGateway + UserDirectory> {
    pub(crate) service: ProvisioningService<G>,
    pub(crate) server_info: McpServerInfo,
}

impl<G: GroupGateway + UserDirectory> ProvisioningMcpServer<G> {
    /// Create a new MCP server with default server information
    pub fn new(service: ProvisioningService<G>) -> Self {
        Self {
            service,
            server_info: McpServerInfo::default(),
        }
    }

    /// Create a new MCP server with custom server information
    pub fn with_info(service: ProvisioningService<G>, server_info: McpServerInfo) -> Self {
        Self {
            service,
            server_info,
        }
    }

    /// Build the service and server from process configuration.
    pub fn from_config(gateway: G, config: &ProvisioningConfig) -> Self {
        let server_info = McpServerInfo {
            name: config.mcp.server_name.clone(),
            ..McpServerInfo::default()
        };
        Self::with_info(ProvisioningService::new(gateway, config), server_info)
    }

    pub fn server_info(&self) -> &McpServerInfo {
        &self.server_info
    }

    pub fn service(&self) -> &ProvisioningService<G> {
        &self.service
    }
}
