//! Error types for provisioning operations.
//!
//! Each layer owns its own error enum: the gateway reports transport outcomes
//! ([`GatewayError`]), the reconciler reports attempt failures
//! ([`ReconciliationError`]) and value objects report construction failures
//! ([`ValidationError`]). [`ProvisioningError`] is the umbrella used at the
//! crate boundary.

use crate::gateway::GatewayError;
use crate::reconciler::ReconciliationError;

/// Main error type for provisioning operations.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// Input failed value-object validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport or remote-status failure from the gateway
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A membership reconciliation attempt failed
    #[error("Reconciliation error: {0}")]
    Reconciliation(#[from] ReconciliationError),
}

/// Validation errors raised when constructing domain values from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Member identifier is empty
    #[error("Member identifier cannot be empty")]
    EmptyMemberId,

    /// Group identifier is not a non-empty run of ASCII digits
    #[error("Invalid group id '{value}': expected a numeric identifier")]
    InvalidGroupId { value: String },

    /// Group display name is empty
    #[error("Group name cannot be empty")]
    EmptyGroupName,

    /// Required field is missing or blank
    #[error("Required field '{field}' is missing")]
    MissingRequiredField { field: String },

    /// Update request carries no fields
    #[error("No fields to update for user '{user_id}'")]
    EmptyUpdate { user_id: String },

    /// Tool or request parameter has an unusable value
    #[error("Invalid parameter '{name}': {details}")]
    InvalidParameter { name: String, details: String },
}

impl ProvisioningError {
    /// Stable machine-readable kind for tool results.
    pub fn kind(&self) -> &'static str {
        match self {
            ProvisioningError::Validation(_) => "validation",
            ProvisioningError::Gateway(e) => e.category(),
            ProvisioningError::Reconciliation(e) => e.kind(),
        }
    }

    /// HTTP status from the remote service behind this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProvisioningError::Gateway(e) => e.status_code(),
            ProvisioningError::Reconciliation(e) => e.gateway_error().status_code(),
            ProvisioningError::Validation(_) => None,
        }
    }
}

impl ValidationError {
    /// Create a missing-required-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            details: details.into(),
        }
    }
}

/// Result type alias for provisioning operations
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
