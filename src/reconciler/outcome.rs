//! Result and error types of a reconciliation attempt.

use crate::gateway::GatewayError;
use crate::membership::{GroupId, GroupTarget, MemberId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a successful reconciliation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// The member was already present; nothing was written.
    AlreadyMember,
    /// The member was appended and the tree replaced.
    Added,
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationStatus::AlreadyMember => write!(f, "already_member"),
            ReconciliationStatus::Added => write!(f, "added"),
        }
    }
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub status: ReconciliationStatus,
    pub member_id: MemberId,
    /// Total members in the group after the attempt.
    pub member_count: usize,
    pub message: String,
}

impl ReconciliationOutcome {
    pub(crate) fn already_member(target: &GroupTarget, member_id: MemberId, count: usize) -> Self {
        let message = format!("User '{member_id}' is already a member of {target}");
        Self {
            status: ReconciliationStatus::AlreadyMember,
            member_id,
            member_count: count,
            message,
        }
    }

    pub(crate) fn added(target: &GroupTarget, member_id: MemberId, count: usize) -> Self {
        let message = format!("Added user '{member_id}' to {target} ({count} members)");
        Self {
            status: ReconciliationStatus::Added,
            member_id,
            member_count: count,
            message,
        }
    }

    pub fn is_added(&self) -> bool {
        self.status == ReconciliationStatus::Added
    }
}

/// Step of the attempt at which a gateway call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStage {
    Fetch,
    Create,
    Write,
}

impl fmt::Display for ReconcileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileStage::Fetch => write!(f, "fetch"),
            ReconcileStage::Create => write!(f, "create"),
            ReconcileStage::Write => write!(f, "write"),
        }
    }
}

/// Failure of a reconciliation attempt.
///
/// The underlying [`GatewayError`] is kept unmodified as the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    /// The target group does not exist.
    #[error("Group {group_id} not found")]
    GroupNotFound {
        group_id: GroupId,
        #[source]
        source: GatewayError,
    },

    /// A gateway call other than a not-found fetch failed.
    #[error("Failed to {stage} group {group_id}: {source}")]
    ReconciliationWriteFailed {
        group_id: GroupId,
        stage: ReconcileStage,
        #[source]
        source: GatewayError,
    },
}

impl ReconciliationError {
    pub(crate) fn write_failed(group_id: &GroupId, stage: ReconcileStage, source: GatewayError) -> Self {
        Self::ReconciliationWriteFailed {
            group_id: group_id.clone(),
            stage,
            source,
        }
    }

    /// Stable machine-readable kind for tool results.
    pub fn kind(&self) -> &'static str {
        match self {
            ReconciliationError::GroupNotFound { .. } => "group_not_found",
            ReconciliationError::ReconciliationWriteFailed { .. } => "reconciliation_write_failed",
        }
    }

    pub fn group_id(&self) -> &GroupId {
        match self {
            ReconciliationError::GroupNotFound { group_id, .. }
            | ReconciliationError::ReconciliationWriteFailed { group_id, .. } => group_id,
        }
    }

    /// The gateway failure behind this error.
    pub fn gateway_error(&self) -> &GatewayError {
        match self {
            ReconciliationError::GroupNotFound { source, .. }
            | ReconciliationError::ReconciliationWriteFailed { source, .. } => source,
        }
    }
}
