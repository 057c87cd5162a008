//! Gateway abstraction over the remote OData service.
//!
//! The reconciliation core only ever talks to the service through
//! [`GroupGateway`]; user CRUD goes through [`UserDirectory`]. Both are
//! implemented by [`ODataGateway`] for real traffic and by
//! [`InMemoryGateway`] for tests and local runs.
//!
//! # Contract
//!
//! - Every call is a single attempt: no retry, no backoff.
//! - Timeouts are enforced by the implementation and surface as
//!   [`GatewayError::Timeout`].
//! - Implementations hold only fixed configuration, so one instance may be
//!   shared by concurrent callers.
//!
//! # Example
//!
//! ```rust
//! use sf_provisioning::gateway::{GroupGateway, InMemoryGateway};
//! use sf_provisioning::membership::GroupId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let group_id = GroupId::new("12")?;
//! gateway.seed_group_members(&group_id, "Admins", &["alice"]).await?;
//!
//! let tree = gateway.fetch_expanded_group(&group_id).await?;
//! assert_eq!(tree["groupName"], "Admins");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;
pub mod odata;

pub use errors::GatewayError;
pub use in_memory::{InMemoryGateway, InMemoryGatewayStats};
pub use odata::ODataGateway;

use crate::filter_tree::FilterTree;
use crate::membership::{GroupId, GroupTarget};
use crate::users::{NewUser, UserQuery, UserUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// Result alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Dynamic-group operations required by the reconciler.
pub trait GroupGateway: Send + Sync {
    /// Fetch a group with its full filter tree expanded.
    ///
    /// Returns the group entity (OData `d` wrapper already removed). A missing
    /// group is reported as [`GatewayError::NotFound`].
    fn fetch_expanded_group(
        &self,
        group_id: &GroupId,
    ) -> impl Future<Output = GatewayResult<Value>> + Send;

    /// Replace the group's entire filter tree.
    fn replace_group(
        &self,
        target: &GroupTarget,
        tree: &FilterTree,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Create a group with the given tree.
    fn create_group(
        &self,
        target: &GroupTarget,
        tree: &FilterTree,
    ) -> impl Future<Output = GatewayResult<()>> + Send;
}

/// CRUD on the simple `User` entity.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a user and return the created entity.
    async fn create_user(&self, user: &NewUser) -> GatewayResult<Value>;

    /// Fetch a user; `Ok(None)` when the user does not exist.
    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<Value>>;

    /// Apply a partial update and return the service's response body.
    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> GatewayResult<Value>;

    async fn delete_user(&self, user_id: &str) -> GatewayResult<()>;

    async fn list_users(&self, query: &UserQuery) -> GatewayResult<Vec<Value>>;

    /// Probe the service by listing a single user.
    async fn test_connection(&self) -> ConnectionReport {
        let checked_at = Utc::now();
        match self.list_users(&UserQuery::new().with_top(1)).await {
            Ok(_) => {
                info!("Connection test successful");
                ConnectionReport {
                    healthy: true,
                    checked_at,
                    error: None,
                }
            }
            Err(e) => {
                error!("Connection test failed: {}", e);
                ConnectionReport {
                    healthy: false,
                    checked_at,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Outcome of [`UserDirectory::test_connection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub healthy: bool,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Strip the OData v2 `{"d": ...}` wrapper if present.
pub(crate) fn unwrap_odata(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("d") => map.remove("d").unwrap_or(Value::Null),
        other => other,
    }
}
