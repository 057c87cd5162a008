//! Provisioning façade.
//!
//! [`ProvisioningService`] is what the tool layer calls. It wraps user CRUD on
//! the [`UserDirectory`] and membership reconciliation into the configured
//! admin group, and turns every expected failure into a result record.
//!
//! # Create-with-role composition
//!
//! - Create fails: overall failure, the role assignment is not attempted.
//! - Create succeeds: the role assignment is always attempted.
//! - Assignment fails after a successful create: overall failure, but the
//!   user-creation step still reports success.

pub mod outcome;

pub use outcome::{ComposedOutcome, ErrorDetail, StepResult};

use crate::config::{ProvisioningConfig, ReconcilerOptions};
use crate::error::{ProvisioningError, ProvisioningResult, ValidationError};
use crate::gateway::{ConnectionReport, GatewayError, GroupGateway, UserDirectory};
use crate::membership::{GroupTarget, MemberId};
use crate::reconciler::{MembershipReconciler, ReconciliationOutcome};
use crate::users::{NewUser, UserQuery, UserUpdate};
use log::{info, warn};
use serde_json::{Value, json};

/// User provisioning operations against one gateway and one admin group.
#[derive(Debug, Clone)]
pub struct ProvisioningService<G: GroupGateway + UserDirectory> {
    reconciler: MembershipReconciler<G>,
    admin_group: GroupTarget,
}

impl<G: GroupGateway + UserDirectory> ProvisioningService<G> {
    pub fn new(gateway: G, config: &ProvisioningConfig) -> Self {
        Self::with_admin_group(gateway, config.admin_group.clone(), config.reconciler)
    }

    pub fn with_admin_group(gateway: G, admin_group: GroupTarget, options: ReconcilerOptions) -> Self {
        Self {
            reconciler: MembershipReconciler::new(gateway, options),
            admin_group,
        }
    }

    pub fn admin_group(&self) -> &GroupTarget {
        &self.admin_group
    }

    pub fn gateway(&self) -> &G {
        self.reconciler.gateway()
    }

    pub fn reconciler(&self) -> &MembershipReconciler<G> {
        &self.reconciler
    }

    /// Add an existing user to the admin group.
    pub async fn add_user_to_admin_role(&self, user_id: &str) -> ProvisioningResult<ReconciliationOutcome> {
        let member = MemberId::new(user_id)?;
        Ok(self.reconciler.reconcile(&self.admin_group, &member).await?)
    }

    /// Create a user, then add it to the admin group.
    pub async fn create_user_with_admin_role(&self, user: &NewUser) -> ComposedOutcome {
        let user_creation = self.create_user(user).await;
        if !user_creation.success {
            warn!(
                "Skipping admin role assignment, user '{}' was not created",
                user.user_id
            );
            return ComposedOutcome::creation_failed(user_creation);
        }

        let assignment = self.add_user_to_admin_role(&user.user_id).await;
        let role_assignment = StepResult::from_reconciliation(&assignment);
        if let Err(e) = &assignment {
            warn!(
                "User '{}' created but admin role assignment failed: {}",
                user.user_id, e
            );
        }
        ComposedOutcome::completed(&user.user_id, user_creation, role_assignment)
    }

    pub async fn create_user(&self, user: &NewUser) -> StepResult {
        if let Err(e) = user.validate() {
            return StepResult::failed(
                format!("Failed to create user: {e}"),
                &ProvisioningError::from(e),
            );
        }
        match self.gateway().create_user(user).await {
            Ok(created) => {
                info!("User created successfully: {}", user.user_id);
                StepResult::ok(
                    format!("User '{}' created", user.user_id),
                    Some(created),
                )
            }
            Err(e) => {
                let err = ProvisioningError::from(e);
                StepResult::failed(format!("Failed to create user: {err}"), &err)
            }
        }
    }

    pub async fn get_user(&self, user_id: &str) -> StepResult {
        match self.gateway().get_user(user_id).await {
            Ok(Some(user)) => StepResult::ok("User retrieved", Some(user)),
            Ok(None) => StepResult::failed(
                format!("User '{user_id}' not found"),
                &ProvisioningError::from(GatewayError::not_found(format!("User('{user_id}')"))),
            ),
            Err(e) => {
                let err = ProvisioningError::from(e);
                StepResult::failed(format!("Failed to retrieve user: {err}"), &err)
            }
        }
    }

    /// Apply `update`; an update with no fields is rejected without a request.
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> StepResult {
        if update.is_empty() {
            let err = ProvisioningError::from(ValidationError::EmptyUpdate {
                user_id: user_id.to_string(),
            });
            return StepResult::failed("No fields to update were provided", &err);
        }
        match self.gateway().update_user(user_id, update).await {
            Ok(updated) => StepResult::ok(format!("User '{user_id}' updated"), Some(updated)),
            Err(e) => {
                let err = ProvisioningError::from(e);
                StepResult::failed(format!("Failed to update user: {err}"), &err)
            }
        }
    }

    pub async fn list_users(&self, query: &UserQuery) -> StepResult {
        match self.gateway().list_users(query).await {
            Ok(users) => {
                let count = users.len();
                StepResult::ok(
                    format!("Retrieved {count} users"),
                    Some(json!({ "count": count, "users": Value::Array(users) })),
                )
            }
            Err(e) => {
                let err = ProvisioningError::from(e);
                StepResult::failed(format!("Failed to list users: {err}"), &err)
            }
        }
    }

    pub async fn test_connection(&self) -> ConnectionReport {
        self.gateway().test_connection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryGateway;
    use crate::membership::GroupId;
    use crate::reconciler::ReconciliationStatus;

    async fn service(members: &[&str]) -> ProvisioningService<InMemoryGateway> {
        let gateway = InMemoryGateway::new();
        let admin = GroupTarget::new(GroupId::new("4521").unwrap(), "Admins").unwrap();
        gateway
            .seed_group_members(admin.id(), admin.name(), members)
            .await
            .unwrap();
        ProvisioningService::with_admin_group(gateway, admin, ReconcilerOptions::default())
    }

    #[tokio::test]
    async fn test_add_user_rejects_empty_id() {
        let service = service(&[]).await;
        let err = service.add_user_to_admin_role("").await.unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::Validation(ValidationError::EmptyMemberId)
        ));
        assert_eq!(service.gateway().stats().await.fetch_calls, 0);
    }

    #[tokio::test]
    async fn test_create_with_role_success() {
        let service = service(&["alice"]).await;
        let outcome = service
            .create_user_with_admin_role(&NewUser::new("U1", "user1"))
            .await;

        assert!(outcome.success);
        assert!(outcome.user_creation.success);
        let assignment = outcome.role_assignment.unwrap();
        assert!(assignment.success);
        assert_eq!(assignment.data.unwrap()["status"], "added");
    }

    #[tokio::test]
    async fn test_create_failure_skips_assignment() {
        let service = service(&[]).await;
        service
            .gateway()
            .fail_next_create_user(GatewayError::Authentication)
            .await;

        let outcome = service
            .create_user_with_admin_role(&NewUser::new("U1", "user1"))
            .await;
        assert!(!outcome.success);
        assert!(outcome.role_assignment.is_none());
        assert_eq!(service.gateway().stats().await.fetch_calls, 0);
    }

    #[tokio::test]
    async fn test_already_member_is_success() {
        let service = service(&["U1"]).await;
        let outcome = service.add_user_to_admin_role("U1").await.unwrap();
        assert_eq!(outcome.status, ReconciliationStatus::AlreadyMember);
    }

    #[tokio::test]
    async fn test_update_requires_fields() {
        let service = service(&[]).await;
        let result = service.update_user("U1", &UserUpdate::new()).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, "validation");
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = service(&[]).await;
        let result = service.get_user("nobody").await;
        assert!(!result.success);
        assert_eq!(result.message, "User 'nobody' not found");
        assert_eq!(result.error.unwrap().kind, "not_found");
    }

    #[tokio::test]
    async fn test_list_users_reports_count() {
        let service = service(&[]).await;
        service.create_user(&NewUser::new("U1", "user1")).await;
        service.create_user(&NewUser::new("U2", "user2")).await;

        let result = service.list_users(&UserQuery::new()).await;
        assert!(result.success);
        assert_eq!(result.message, "Retrieved 2 users");
        assert_eq!(result.data.unwrap()["count"], 2);
    }
}
