//! Stdio MCP server exposing the provisioning tools.
//!
//! Reads configuration from the environment (and `.env` if present), then
//! serves JSON-RPC on stdin/stdout until EOF. Logs go to stderr; the default
//! level comes from `LOG_LEVEL` and can be overridden with `RUST_LOG`.

use log::{error, info};
use sf_provisioning::mcp_integration::ProvisioningMcpServer;
use sf_provisioning::{ODataGateway, ProvisioningConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = match ProvisioningConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Stderr)
                .init();
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.mcp.log_level.as_str()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    info!("Starting {}", config.mcp.server_name);
    info!("OData endpoint: {}", config.gateway.odata_endpoint());
    info!("Admin group: {}", config.admin_group);

    let gateway = ODataGateway::new(&config.gateway)?;
    let server = ProvisioningMcpServer::from_config(gateway, &config);
    server.run_stdio().await
}
