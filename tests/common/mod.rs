//! Shared helpers for the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use sf_provisioning::config::ReconcilerOptions;
use sf_provisioning::gateway::InMemoryGateway;
use sf_provisioning::membership::{GroupId, GroupTarget, MemberId, MemberList};
use sf_provisioning::reconciler::MembershipReconciler;

pub const ADMIN_GROUP_ID: &str = "4521";
pub const ADMIN_GROUP_NAME: &str = "IBM管理者用権限グループ";

pub fn admin_target() -> GroupTarget {
    GroupTarget::new(GroupId::new(ADMIN_GROUP_ID).unwrap(), ADMIN_GROUP_NAME).unwrap()
}

pub fn member(value: &str) -> MemberId {
    MemberId::new(value).unwrap()
}

pub fn member_list(values: &[&str]) -> MemberList {
    values.iter().map(|v| member(v)).collect()
}

/// Gateway holding the admin group with `members`.
pub async fn seeded_gateway(members: &[&str]) -> InMemoryGateway {
    let gateway = InMemoryGateway::new();
    let target = admin_target();
    gateway
        .seed_group_members(target.id(), target.name(), members)
        .await
        .unwrap();
    gateway
}

pub fn reconciler(
    gateway: &InMemoryGateway,
    options: ReconcilerOptions,
) -> MembershipReconciler<InMemoryGateway> {
    MembershipReconciler::new(gateway.clone(), options)
}

/// Current admin group members as plain strings.
pub async fn admin_members(gateway: &InMemoryGateway) -> Vec<String> {
    gateway
        .group_members(admin_target().id())
        .await
        .map(|members| members.to_strings())
        .unwrap_or_default()
}

/// Group entity as the service returns it, with every level bare.
pub fn bare_group(members: &[&str]) -> Value {
    let pools: Vec<Value> = members
        .iter()
        .map(|m| {
            json!({
                "filters": {
                    "name": "username",
                    "expressions": {
                        "operator": "equals",
                        "values": { "fieldValue": m }
                    }
                }
            })
        })
        .collect();
    json!({
        "groupID": ADMIN_GROUP_ID,
        "groupName": ADMIN_GROUP_NAME,
        "dgIncludePools": pools
    })
}
