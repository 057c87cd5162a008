//! Process configuration.
//!
//! Configuration is an explicit value: it is loaded once (from the environment
//! or built in code) and handed to the gateway and reconciler constructors.
//! Nothing reads the environment after startup.
//!
//! # Example Usage
//!
//! ```rust
//! use sf_provisioning::config::{GatewayConfig, OnMissingGroup, ProvisioningConfig, ReconcilerOptions};
//! use sf_provisioning::membership::{GroupId, GroupTarget};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GatewayConfig::new("https://api.example.com", "ACME", "apiuser", "secret");
//!     let admin_group = GroupTarget::new(GroupId::new("4521")?, "Administrators")?;
//!
//!     let config = ProvisioningConfig::new(gateway, admin_group).with_reconciler_options(
//!         ReconcilerOptions::default().with_on_missing_group(OnMissingGroup::Fail),
//!     );
//!     assert_eq!(config.gateway.odata_endpoint(), "https://api.example.com/odata/v2");
//!     Ok(())
//! }
//! ```

use crate::membership::{GroupId, GroupTarget};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Display name used for the admin group when none is configured.
pub const DEFAULT_ADMIN_GROUP_NAME: &str = "IBM管理者用権限グループ";

/// Default tool-server display name.
pub const DEFAULT_SERVER_NAME: &str = "SAP SuccessFactors User Management";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Variable is set but unusable
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

impl ConfigError {
    fn invalid(var: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            var: var.to_string(),
            message: message.into(),
        }
    }
}

/// Connection settings for the OData service.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub company_id: String,
    pub user_id: String,
    password: String,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        base_url: impl Into<String>,
        company_id: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            company_id: company_id.into(),
            user_id: user_id.into(),
            password: password.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// `<base_url>/odata/v2`
    pub fn odata_endpoint(&self) -> String {
        format!("{}/odata/v2", self.base_url)
    }

    /// Basic-auth principal in the service's `user@company` form.
    pub fn principal(&self) -> String {
        format!("{}@{}", self.user_id, self.company_id)
    }

    /// Value for the `Authorization` header.
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.principal(), self.password);
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("user_id", &self.user_id)
            .field("password", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// What to do when the target group does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMissingGroup {
    /// Report `GroupNotFound`.
    #[default]
    Fail,
    /// Create the group with an empty tree, then reconcile into it.
    CreateEmpty,
}

impl FromStr for OnMissingGroup {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(OnMissingGroup::Fail),
            "create_empty" | "create-empty" => Ok(OnMissingGroup::CreateEmpty),
            other => Err(ConfigError::invalid(
                "SAP_ON_MISSING_GROUP",
                format!("expected 'fail' or 'create_empty', got '{other}'"),
            )),
        }
    }
}

/// Reconciliation policy switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerOptions {
    pub on_missing_group: OnMissingGroup,
    /// Serialize reconciliations of the same group within this process.
    pub serialize_per_group: bool,
}

impl ReconcilerOptions {
    pub fn with_on_missing_group(mut self, policy: OnMissingGroup) -> Self {
        self.on_missing_group = policy;
        self
    }

    pub fn with_serialize_per_group(mut self, enabled: bool) -> Self {
        self.serialize_per_group = enabled;
        self
    }
}

/// Tool-server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpConfig {
    pub server_name: String,
    pub log_level: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    pub gateway: GatewayConfig,
    pub admin_group: GroupTarget,
    pub reconciler: ReconcilerOptions,
    pub mcp: McpConfig,
}

impl ProvisioningConfig {
    pub fn new(gateway: GatewayConfig, admin_group: GroupTarget) -> Self {
        Self {
            gateway,
            admin_group,
            reconciler: ReconcilerOptions::default(),
            mcp: McpConfig::default(),
        }
    }

    pub fn with_reconciler_options(mut self, options: ReconcilerOptions) -> Self {
        self.reconciler = options;
        self
    }

    pub fn with_mcp(mut self, mcp: McpConfig) -> Self {
        self.mcp = mcp;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Required Variables
    ///
    /// - `SAP_API_URL`, `SAP_COMPANY_ID`, `SAP_USER_ID`, `SAP_PASSWORD`
    /// - `SAP_ADMIN_GROUP_ID` - numeric id of the admin dynamic group
    ///
    /// # Optional Variables
    ///
    /// - `SAP_REQUEST_TIMEOUT_SECS` (default: 30)
    /// - `SAP_ADMIN_GROUP_NAME` (default: `IBM管理者用権限グループ`)
    /// - `SAP_ON_MISSING_GROUP` - `fail` | `create_empty` (default: `fail`)
    /// - `SAP_SERIALIZE_PER_GROUP` - `true` | `false` (default: `false`)
    /// - `MCP_SERVER_NAME`, `LOG_LEVEL` (default: `info`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };

        let base_url = required("SAP_API_URL")?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "SAP_API_URL",
                "must start with http:// or https://",
            ));
        }

        let mut gateway = GatewayConfig::new(
            base_url,
            required("SAP_COMPANY_ID")?,
            required("SAP_USER_ID")?,
            required("SAP_PASSWORD")?,
        );
        if let Some(raw) = lookup("SAP_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("SAP_REQUEST_TIMEOUT_SECS", "not a number"))?;
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "SAP_REQUEST_TIMEOUT_SECS",
                    "must be greater than zero",
                ));
            }
            gateway = gateway.with_timeout(Duration::from_secs(secs));
        }

        let group_id = GroupId::new(required("SAP_ADMIN_GROUP_ID")?.trim())
            .map_err(|e| ConfigError::invalid("SAP_ADMIN_GROUP_ID", e.to_string()))?;
        let group_name = lookup("SAP_ADMIN_GROUP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_GROUP_NAME.to_string());
        let admin_group = GroupTarget::new(group_id, group_name)
            .map_err(|e| ConfigError::invalid("SAP_ADMIN_GROUP_NAME", e.to_string()))?;

        let on_missing_group = match lookup("SAP_ON_MISSING_GROUP") {
            Some(raw) => raw.parse()?,
            None => OnMissingGroup::default(),
        };
        let serialize_per_group = match lookup("SAP_SERIALIZE_PER_GROUP") {
            Some(raw) => parse_bool("SAP_SERIALIZE_PER_GROUP", &raw)?,
            None => false,
        };

        let mcp = McpConfig {
            server_name: lookup("MCP_SERVER_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            log_level: lookup("LOG_LEVEL")
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            gateway,
            admin_group,
            reconciler: ReconcilerOptions {
                on_missing_group,
                serialize_per_group,
            },
            mcp,
        })
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::invalid(var, format!("expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SAP_API_URL", "https://api.example.com/"),
            ("SAP_COMPANY_ID", "ACME"),
            ("SAP_USER_ID", "apiuser"),
            ("SAP_PASSWORD", "secret"),
            ("SAP_ADMIN_GROUP_ID", "4521"),
        ]
    }

    #[test]
    fn test_minimal_env_uses_defaults() {
        let config = ProvisioningConfig::from_lookup(lookup_from(&minimal())).unwrap();

        assert_eq!(config.gateway.base_url, "https://api.example.com");
        assert_eq!(config.gateway.request_timeout, Duration::from_secs(30));
        assert_eq!(config.admin_group.id().as_str(), "4521");
        assert_eq!(config.admin_group.name(), DEFAULT_ADMIN_GROUP_NAME);
        assert_eq!(config.reconciler.on_missing_group, OnMissingGroup::Fail);
        assert!(!config.reconciler.serialize_per_group);
        assert_eq!(config.mcp.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(config.mcp.log_level, "info");
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("SAP_REQUEST_TIMEOUT_SECS", "5"),
            ("SAP_ADMIN_GROUP_NAME", "Admins"),
            ("SAP_ON_MISSING_GROUP", "create_empty"),
            ("SAP_SERIALIZE_PER_GROUP", "true"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        let config = ProvisioningConfig::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.gateway.request_timeout, Duration::from_secs(5));
        assert_eq!(config.admin_group.name(), "Admins");
        assert_eq!(config.reconciler.on_missing_group, OnMissingGroup::CreateEmpty);
        assert!(config.reconciler.serialize_per_group);
        assert_eq!(config.mcp.log_level, "debug");
    }

    #[test]
    fn test_missing_required_var() {
        let vars: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "SAP_PASSWORD")
            .collect();
        assert_eq!(
            ProvisioningConfig::from_lookup(lookup_from(&vars)).unwrap_err(),
            ConfigError::MissingVar("SAP_PASSWORD".to_string())
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = minimal();
        vars.push(("SAP_ON_MISSING_GROUP", "auto"));
        assert!(matches!(
            ProvisioningConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut vars = minimal();
        vars.retain(|(k, _)| *k != "SAP_ADMIN_GROUP_ID");
        vars.push(("SAP_ADMIN_GROUP_ID", "admins"));
        assert!(matches!(
            ProvisioningConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::InvalidValue { var, .. }) if var == "SAP_ADMIN_GROUP_ID"
        ));

        let mut vars = minimal();
        vars.retain(|(k, _)| *k != "SAP_API_URL");
        vars.push(("SAP_API_URL", "api.example.com"));
        assert!(matches!(
            ProvisioningConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::InvalidValue { var, .. }) if var == "SAP_API_URL"
        ));
    }

    #[test]
    fn test_basic_auth_header_uses_user_at_company() {
        let config = GatewayConfig::new("https://api.example.com", "ACME", "apiuser", "secret");
        assert_eq!(config.principal(), "apiuser@ACME");
        // base64("apiuser@ACME:secret")
        assert_eq!(config.basic_auth_header(), "Basic YXBpdXNlckBBQ01FOnNlY3JldA==");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = GatewayConfig::new("https://api.example.com", "ACME", "apiuser", "secret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_on_missing_group_parsing() {
        assert_eq!("fail".parse::<OnMissingGroup>().unwrap(), OnMissingGroup::Fail);
        assert_eq!(
            "Create-Empty".parse::<OnMissingGroup>().unwrap(),
            OnMissingGroup::CreateEmpty
        );
        assert!("".parse::<OnMissingGroup>().is_err());
    }
}
