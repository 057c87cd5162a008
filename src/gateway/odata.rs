//! HTTP gateway for the SuccessFactors OData v2 API.
//!
//! Every request carries Basic authentication for `user@company`, JSON
//! accept/content headers, and the configured timeout. Responses have their
//! `{"d": ...}` wrapper removed before they are returned.

use super::{GatewayResult, GroupGateway, UserDirectory, unwrap_odata};
use crate::config::GatewayConfig;
use crate::filter_tree::{EXPAND_PATH, FilterTree};
use crate::gateway::GatewayError;
use crate::membership::{GroupId, GroupTarget};
use crate::users::{NewUser, UserQuery, UserUpdate};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Gateway backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ODataGateway {
    endpoint: String,
    auth_header: String,
    http_client: Client,
}

impl ODataGateway {
    /// Build a gateway with its own HTTP client.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::InvalidConfig {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        info!("OData gateway initialized for {}", config.base_url);
        Ok(Self::with_http_client(config, http_client))
    }

    /// Build a gateway around a pre-built client.
    pub fn with_http_client(config: &GatewayConfig, http_client: Client) -> Self {
        Self {
            endpoint: config.odata_endpoint(),
            auth_header: config.basic_auth_header(),
            http_client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        resource: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> GatewayResult<Value> {
        let url = format!("{}/{}", self.endpoint, resource);
        debug!("OData {} {}", method, url);

        let mut builder = self
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = GatewayError::from(e);
            error!("Request to {} failed: {}", url, err);
            err
        })?;
        self.handle_response(resource, response).await
    }

    async fn handle_response(
        &self,
        resource: &str,
        response: reqwest::Response,
    ) -> GatewayResult<Value> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
                return Ok(Value::Null);
            }
            let parsed: Value = serde_json::from_str(&body)?;
            return Ok(unwrap_odata(parsed));
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                error!("Authentication failed");
                Err(GatewayError::Authentication)
            }
            StatusCode::FORBIDDEN => {
                error!("Access forbidden: {}", resource);
                Err(GatewayError::forbidden(resource))
            }
            StatusCode::NOT_FOUND => {
                debug!("Resource not found: {}", resource);
                Err(GatewayError::not_found(resource))
            }
            _ => {
                error!("API error: {} - {}", status.as_u16(), body);
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(GatewayError::api(status.as_u16(), detail))
            }
        }
    }
}

/// `User('<id>')` with single quotes doubled.
fn user_key(user_id: &str) -> String {
    format!("User('{}')", user_id.replace('\'', "''"))
}

impl GroupGateway for ODataGateway {
    async fn fetch_expanded_group(&self, group_id: &GroupId) -> GatewayResult<Value> {
        let query = [
            ("$expand", EXPAND_PATH.to_string()),
            ("$format", "json".to_string()),
        ];
        self.request::<Value>(Method::GET, &group_id.odata_key(), &query, None)
            .await
    }

    async fn replace_group(&self, target: &GroupTarget, tree: &FilterTree) -> GatewayResult<()> {
        info!(
            "Replacing filter tree of {} ({} pools)",
            target,
            tree.pool_count()
        );
        self.request(Method::PUT, &target.id().odata_key(), &[], Some(tree))
            .await?;
        Ok(())
    }

    async fn create_group(&self, target: &GroupTarget, tree: &FilterTree) -> GatewayResult<()> {
        info!("Creating dynamic group {}", target);
        self.request(Method::POST, "DynamicGroup", &[], Some(tree))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for ODataGateway {
    async fn create_user(&self, user: &NewUser) -> GatewayResult<Value> {
        info!("Creating user: {}", user.user_id);
        let created = self
            .request(Method::POST, "User", &[], Some(&user.to_payload()))
            .await?;
        info!("User created successfully: {}", user.user_id);
        Ok(created)
    }

    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<Value>> {
        match self
            .request::<Value>(Method::GET, &user_key(user_id), &[], None)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(GatewayError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> GatewayResult<Value> {
        info!("Updating user: {}", user_id);
        let updated = self
            .request(Method::PUT, &user_key(user_id), &[], Some(update))
            .await?;
        info!("User updated successfully: {}", user_id);
        Ok(updated)
    }

    async fn delete_user(&self, user_id: &str) -> GatewayResult<()> {
        info!("Deleting user: {}", user_id);
        self.request::<Value>(Method::DELETE, &user_key(user_id), &[], None)
            .await?;
        info!("User deleted successfully: {}", user_id);
        Ok(())
    }

    async fn list_users(&self, query: &UserQuery) -> GatewayResult<Vec<Value>> {
        let mut params = vec![
            ("$top", query.top.to_string()),
            ("$skip", query.skip.to_string()),
            ("$format", "json".to_string()),
        ];
        if let Some(filter) = &query.filter {
            params.push(("$filter", filter.clone()));
        }

        let response = self
            .request::<Value>(Method::GET, "User", &params, None)
            .await?;
        Ok(match response {
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(users)) => users,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_escapes_quotes() {
        assert_eq!(user_key("U1"), "User('U1')");
        assert_eq!(user_key("o'brien"), "User('o''brien')");
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = GatewayConfig::new("https://api.example.com/", "ACME", "apiuser", "secret");
        let gateway = ODataGateway::new(&config).unwrap();
        assert_eq!(gateway.endpoint(), "https://api.example.com/odata/v2");
    }
}
