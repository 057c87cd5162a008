//! SAP SuccessFactors user provisioning for Rust.
//!
//! Provides user CRUD against the SuccessFactors OData v2 API and adds users
//! to a dynamic permission group, whose membership the service stores as a
//! filter tree that can only be replaced as a whole.
//!
//! # Core Components
//!
//! - [`filter_tree`] - decode/encode between filter trees and member lists
//! - [`MembershipReconciler`] - fetch, merge and replace a group's membership
//! - [`GroupGateway`] / [`UserDirectory`] - traits over the remote service,
//!   implemented by [`ODataGateway`] and [`InMemoryGateway`]
//! - [`ProvisioningService`] - the operations exposed as tools
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sf_provisioning::{ODataGateway, ProvisioningConfig, ProvisioningService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProvisioningConfig::from_env()?;
//! let gateway = ODataGateway::new(&config.gateway)?;
//! let service = ProvisioningService::new(gateway, &config);
//!
//! let outcome = service.add_user_to_admin_role("BobTEST0004").await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter_tree;
pub mod gateway;
/// Model Context Protocol integration for AI agents.
///
/// This module is only available when the `mcp` feature is enabled.
#[cfg(feature = "mcp")]
pub mod mcp_integration;
pub mod membership;
pub mod provisioning;
pub mod reconciler;
pub mod users;

// Re-export commonly used types for convenience
pub use config::{GatewayConfig, OnMissingGroup, ProvisioningConfig, ReconcilerOptions};
pub use error::{ProvisioningError, ProvisioningResult, ValidationError};
pub use filter_tree::{DecodeError, FilterTree, decode, encode};
pub use gateway::{GatewayError, GroupGateway, InMemoryGateway, ODataGateway, UserDirectory};
pub use membership::{GroupId, GroupTarget, MemberId, MemberList};
pub use provisioning::{ComposedOutcome, ProvisioningService, StepResult};
pub use reconciler::{
    GroupLocks, MembershipReconciler, ReconciliationError, ReconciliationOutcome,
    ReconciliationStatus,
};
pub use users::{NewUser, UserQuery, UserUpdate};

// MCP integration re-exports (feature-gated)
#[cfg(feature = "mcp")]
pub use mcp_integration::{McpServerInfo, ProvisioningMcpServer, ToolResult};
