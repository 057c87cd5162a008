//! Membership reconciliation.
//!
//! The remote service only supports replacing a group's whole filter tree, so
//! adding a member is a read-modify-write cycle:
//!
//! 1. **Fetch** the expanded group through the [`GroupGateway`].
//! 2. **Decode** the current members. A tree that cannot be decoded counts as
//!    zero members and is logged; it does not fail the attempt.
//! 3. **Check** for the member by exact string match. A present member ends the
//!    attempt as [`ReconciliationStatus::AlreadyMember`] with no write.
//! 4. **Merge** by appending the member after the existing ones.
//! 5. **Encode and write** the merged list with one full-tree replace.
//!
//! Each attempt makes exactly one fetch and at most one write (plus one create
//! under [`OnMissingGroup::CreateEmpty`]). Nothing is retried and no state is
//! kept between attempts.
//!
//! # Concurrency
//!
//! The window between fetch and write is not guarded: two concurrent attempts
//! on the same group can each read the old tree, and the later replace wins,
//! dropping the member added by the other. With
//! [`ReconcilerOptions::serialize_per_group`] enabled, attempts on the same
//! group are serialized through [`GroupLocks`], which only covers callers that
//! share this reconciler.
//!
//! # Example
//!
//! ```rust
//! use sf_provisioning::config::ReconcilerOptions;
//! use sf_provisioning::gateway::InMemoryGateway;
//! use sf_provisioning::membership::{GroupId, GroupTarget, MemberId};
//! use sf_provisioning::reconciler::{MembershipReconciler, ReconciliationStatus};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let target = GroupTarget::new(GroupId::new("4521")?, "Admins")?;
//! gateway.seed_group_members(target.id(), target.name(), &["alice", "bob"]).await?;
//!
//! let reconciler = MembershipReconciler::new(gateway, ReconcilerOptions::default());
//! let outcome = reconciler.reconcile(&target, &MemberId::new("carol")?).await?;
//! assert_eq!(outcome.status, ReconciliationStatus::Added);
//! assert_eq!(outcome.member_count, 3);
//! # Ok(())
//! # }
//! ```

pub mod locks;
pub mod outcome;

pub use locks::GroupLocks;
pub use outcome::{ReconcileStage, ReconciliationError, ReconciliationOutcome, ReconciliationStatus};

use crate::config::{OnMissingGroup, ReconcilerOptions};
use crate::filter_tree::{decode, encode};
use crate::gateway::GroupGateway;
use crate::membership::{GroupTarget, MemberId, MemberList};
use log::{debug, error, info, warn};
use serde_json::Value;

/// Ensures members are present in dynamic groups.
#[derive(Debug, Clone)]
pub struct MembershipReconciler<G: GroupGateway> {
    gateway: G,
    options: ReconcilerOptions,
    locks: Option<GroupLocks>,
}

impl<G: GroupGateway> MembershipReconciler<G> {
    pub fn new(gateway: G, options: ReconcilerOptions) -> Self {
        let locks = options.serialize_per_group.then(GroupLocks::new);
        Self {
            gateway,
            options,
            locks,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn options(&self) -> &ReconcilerOptions {
        &self.options
    }

    /// Make sure `member` is in `target`'s filter tree, keeping every existing member.
    pub async fn reconcile(
        &self,
        target: &GroupTarget,
        member: &MemberId,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(target.id()).await),
            None => None,
        };

        info!("Reconciling member '{}' into {}", member, target);

        let mut members = match self.fetch_current(target).await? {
            Some(tree) => self.decode_members(target, &tree),
            None => MemberList::new(),
        };

        if members.contains(member) {
            info!("'{}' is already a member of {}, nothing to write", member, target);
            return Ok(ReconciliationOutcome::already_member(
                target,
                member.clone(),
                members.len(),
            ));
        }

        members.push(member.clone());
        let tree = encode(target.id(), target.name(), &members);
        self.gateway
            .replace_group(target, &tree)
            .await
            .map_err(|e| {
                error!("Replacing filter tree of {} failed: {}", target, e);
                ReconciliationError::write_failed(target.id(), ReconcileStage::Write, e)
            })?;

        info!("Added '{}' to {} ({} members)", member, target, members.len());
        Ok(ReconciliationOutcome::added(target, member.clone(), members.len()))
    }

    /// Fetch the expanded tree. `None` means the group was just created empty.
    async fn fetch_current(&self, target: &GroupTarget) -> Result<Option<Value>, ReconciliationError> {
        match self.gateway.fetch_expanded_group(target.id()).await {
            Ok(tree) => Ok(Some(tree)),
            Err(e) if e.is_not_found() => match self.options.on_missing_group {
                OnMissingGroup::Fail => {
                    warn!("Group {} does not exist", target);
                    Err(ReconciliationError::GroupNotFound {
                        group_id: target.id().clone(),
                        source: e,
                    })
                }
                OnMissingGroup::CreateEmpty => {
                    warn!("Group {} does not exist, creating it empty", target);
                    let empty = encode(target.id(), target.name(), &MemberList::new());
                    self.gateway
                        .create_group(target, &empty)
                        .await
                        .map_err(|e| {
                            error!("Creating group {} failed: {}", target, e);
                            ReconciliationError::write_failed(target.id(), ReconcileStage::Create, e)
                        })?;
                    Ok(None)
                }
            },
            Err(e) => {
                error!("Fetching group {} failed: {}", target, e);
                Err(ReconciliationError::write_failed(
                    target.id(),
                    ReconcileStage::Fetch,
                    e,
                ))
            }
        }
    }

    fn decode_members(&self, target: &GroupTarget, tree: &Value) -> MemberList {
        match decode(tree) {
            Ok(members) => {
                debug!("Decoded {} members of {}", members.len(), target);
                members
            }
            Err(e) => {
                warn!(
                    "Could not decode filter tree of {}, treating it as empty: {}",
                    target, e
                );
                MemberList::new()
            }
        }
    }
}
