//! Gateway error taxonomy.
//!
//! These errors describe transport and remote-status outcomes only. They carry
//! no knowledge of groups or reconciliation; the reconciler wraps them as the
//! detail of its own error kinds.

/// Errors returned by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The service rejected the credentials (HTTP 401).
    #[error("Authentication failed: check company id, user id and password")]
    Authentication,

    /// The API user lacks permission for the resource (HTTP 403).
    #[error("Access forbidden: check the API user's permissions for {resource}")]
    Forbidden { resource: String },

    /// The addressed resource does not exist (HTTP 404).
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success status.
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The service could not be reached.
    #[error("Cannot connect to the service: {message}")]
    Connection { message: String },

    /// A success response whose body could not be parsed or built.
    #[error("Failed to parse response: {message}")]
    Parse { message: String },

    /// The gateway could not be constructed from its configuration.
    #[error("Invalid gateway configuration: {message}")]
    InvalidConfig { message: String },
}

impl GatewayError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn forbidden(resource: impl Into<String>) -> Self {
        Self::Forbidden {
            resource: resource.into(),
        }
    }

    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }

    /// HTTP status behind the error, when there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Authentication => Some(401),
            GatewayError::Forbidden { .. } => Some(403),
            GatewayError::NotFound { .. } => Some(404),
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable category for tool results.
    pub fn category(&self) -> &'static str {
        match self {
            GatewayError::Authentication => "authentication",
            GatewayError::Forbidden { .. } => "forbidden",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::Api { .. } => "api_error",
            GatewayError::Timeout => "timeout",
            GatewayError::Connection { .. } => "connection",
            GatewayError::Parse { .. } => "parse",
            GatewayError::InvalidConfig { .. } => "invalid_config",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::parse(err.to_string())
        } else if err.is_builder() {
            GatewayError::InvalidConfig {
                message: err.to_string(),
            }
        } else {
            GatewayError::connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::Authentication.status_code(), Some(401));
        assert_eq!(GatewayError::forbidden("User").status_code(), Some(403));
        assert_eq!(GatewayError::not_found("User").status_code(), Some(404));
        assert_eq!(GatewayError::api(500, "boom").status_code(), Some(500));
        assert_eq!(GatewayError::Timeout.status_code(), None);
        assert_eq!(GatewayError::connection("refused").status_code(), None);
    }

    #[test]
    fn test_not_found_detection() {
        assert!(GatewayError::not_found("DynamicGroup(1L)").is_not_found());
        assert!(!GatewayError::api(404, "wrapped").is_not_found());
    }

    #[test]
    fn test_categories_and_messages() {
        assert_eq!(GatewayError::Timeout.category(), "timeout");
        assert_eq!(
            GatewayError::api(400, "bad filter").to_string(),
            "API error 400: bad filter"
        );
        assert_eq!(
            GatewayError::not_found("User('x')").to_string(),
            "Resource not found: User('x')"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(GatewayError::from(err), GatewayError::Parse { .. }));
    }
}
