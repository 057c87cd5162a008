//! Result records returned by the provisioning façade.
//!
//! Every record carries an explicit `success` flag and a display message so
//! tool callers can show it without further translation.

use crate::error::ProvisioningError;
use crate::reconciler::ReconciliationOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Machine-readable description of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&ProvisioningError> for ErrorDetail {
    fn from(err: &ProvisioningError) -> Self {
        Self {
            kind: err.kind().to_string(),
            detail: err.to_string(),
            status: err.status_code(),
        }
    }
}

/// Result of one step (a user operation or a role assignment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl StepResult {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: &ProvisioningError) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ErrorDetail::from(error)),
        }
    }

    /// Wrap a reconciliation result.
    pub fn from_reconciliation(
        result: &Result<ReconciliationOutcome, ProvisioningError>,
    ) -> Self {
        match result {
            Ok(outcome) => Self::ok(
                outcome.message.clone(),
                serde_json::to_value(outcome).ok(),
            ),
            Err(e) => Self::failed(format!("Failed to add user to group: {e}"), e),
        }
    }
}

/// Result of creating a user and assigning the admin role.
///
/// `role_assignment` is `None` when user creation failed and the assignment
/// was not attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedOutcome {
    pub success: bool,
    pub message: String,
    pub user_creation: StepResult,
    pub role_assignment: Option<StepResult>,
}

impl ComposedOutcome {
    pub(crate) fn creation_failed(user_creation: StepResult) -> Self {
        Self {
            success: false,
            message: user_creation.message.clone(),
            user_creation,
            role_assignment: None,
        }
    }

    pub(crate) fn completed(user_id: &str, user_creation: StepResult, role_assignment: StepResult) -> Self {
        let (success, message) = if role_assignment.success {
            (
                true,
                format!("User '{user_id}' created and added to the admin group"),
            )
        } else {
            (
                false,
                format!(
                    "User '{user_id}' was created but could not be added to the admin group: {}",
                    role_assignment.message
                ),
            )
        };
        Self {
            success,
            message,
            user_creation,
            role_assignment: Some(role_assignment),
        }
    }

    /// The user exists but the role assignment failed.
    pub fn is_partial(&self) -> bool {
        !self.success && self.user_creation.success
    }
}
