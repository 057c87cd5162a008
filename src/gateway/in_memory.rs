//! In-memory gateway implementation.
//!
//! Stands in for the remote service in tests and local runs. Groups are stored
//! as the raw JSON a fetch would return, so any wire shape can be seeded, and
//! every call is counted so tests can assert how many writes were issued.
//!
//! # Features
//!
//! * Thread-safe concurrent access with async RwLock
//! * One-shot fault injection per operation (`fail_next_*`)
//! * Call counters exposed through [`InMemoryGateway::stats`]
//!
//! # Example Usage
//!
//! ```rust
//! use sf_provisioning::gateway::{GatewayError, GroupGateway, InMemoryGateway};
//! use sf_provisioning::membership::GroupId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let group_id = GroupId::new("12")?;
//!
//! let missing = gateway.fetch_expanded_group(&group_id).await;
//! assert!(matches!(missing, Err(GatewayError::NotFound { .. })));
//!
//! gateway.seed_group_members(&group_id, "Admins", &["alice", "bob"]).await?;
//! let members = gateway.group_members(&group_id).await.unwrap();
//! assert_eq!(members.to_strings(), vec!["alice", "bob"]);
//! assert_eq!(gateway.stats().await.fetch_calls, 1);
//! # Ok(())
//! # }
//! ```

use crate::error::ValidationResult;
use crate::filter_tree::{FilterTree, decode, encode};
use crate::gateway::{GatewayError, GatewayResult, GroupGateway, UserDirectory};
use crate::membership::{GroupId, GroupTarget, MemberId, MemberList};
use crate::users::{NewUser, UserQuery, UserUpdate};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct GatewayState {
    // group id -> entity JSON as returned by fetch
    groups: HashMap<String, Value>,
    // user id -> entity JSON
    users: BTreeMap<String, Value>,
    faults: Faults,
}

#[derive(Default)]
struct Faults {
    fetch: Option<GatewayError>,
    replace: Option<GatewayError>,
    create_group: Option<GatewayError>,
    create_user: Option<GatewayError>,
    list_users: Option<GatewayError>,
}

#[derive(Default)]
struct CallCounters {
    fetch: AtomicUsize,
    replace: AtomicUsize,
    create_group: AtomicUsize,
    create_user: AtomicUsize,
}

/// Thread-safe in-memory stand-in for the OData service.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
    calls: Arc<CallCounters>,
}

/// Snapshot of stored entities and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryGatewayStats {
    pub group_count: usize,
    pub user_count: usize,
    pub fetch_calls: usize,
    pub replace_calls: usize,
    pub create_group_calls: usize,
    pub create_user_calls: usize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a group entity exactly as given.
    pub async fn seed_group(&self, group_id: &GroupId, entity: Value) {
        let mut state = self.state.write().await;
        state.groups.insert(group_id.as_str().to_string(), entity);
    }

    /// Store a group whose tree lists `members`, in the shape the codec writes.
    pub async fn seed_group_members(
        &self,
        group_id: &GroupId,
        group_name: &str,
        members: &[&str],
    ) -> ValidationResult<()> {
        let list = members
            .iter()
            .map(|m| MemberId::new(*m))
            .collect::<ValidationResult<MemberList>>()?;
        let tree = encode(group_id, group_name, &list);
        // FilterTree holds only strings, so this conversion cannot fail.
        let entity = serde_json::to_value(&tree).unwrap_or(Value::Null);
        self.seed_group(group_id, entity).await;
        Ok(())
    }

    /// Raw stored entity for a group.
    pub async fn group_entity(&self, group_id: &GroupId) -> Option<Value> {
        let state = self.state.read().await;
        state.groups.get(group_id.as_str()).cloned()
    }

    /// Decoded membership of a stored group; `None` if absent or undecodable.
    pub async fn group_members(&self, group_id: &GroupId) -> Option<MemberList> {
        let entity = self.group_entity(group_id).await?;
        decode(&entity).ok()
    }

    /// Store a user entity directly.
    pub async fn seed_user(&self, user_id: &str, entity: Value) {
        let mut state = self.state.write().await;
        state.users.insert(user_id.to_string(), entity);
    }

    pub async fn fail_next_fetch(&self, error: GatewayError) {
        self.state.write().await.faults.fetch = Some(error);
    }

    pub async fn fail_next_replace(&self, error: GatewayError) {
        self.state.write().await.faults.replace = Some(error);
    }

    pub async fn fail_next_create_group(&self, error: GatewayError) {
        self.state.write().await.faults.create_group = Some(error);
    }

    pub async fn fail_next_create_user(&self, error: GatewayError) {
        self.state.write().await.faults.create_user = Some(error);
    }

    pub async fn fail_next_list_users(&self, error: GatewayError) {
        self.state.write().await.faults.list_users = Some(error);
    }

    pub async fn stats(&self) -> InMemoryGatewayStats {
        let state = self.state.read().await;
        InMemoryGatewayStats {
            group_count: state.groups.len(),
            user_count: state.users.len(),
            fetch_calls: self.calls.fetch.load(Ordering::SeqCst),
            replace_calls: self.calls.replace.load(Ordering::SeqCst),
            create_group_calls: self.calls.create_group.load(Ordering::SeqCst),
            create_user_calls: self.calls.create_user.load(Ordering::SeqCst),
        }
    }

    /// Drop all entities and pending faults. Call counters are kept.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = GatewayState::default();
    }

    fn user_key(user_id: &str) -> String {
        format!("User('{user_id}')")
    }
}

impl GroupGateway for InMemoryGateway {
    async fn fetch_expanded_group(&self, group_id: &GroupId) -> GatewayResult<Value> {
        self.calls.fetch.fetch_add(1, Ordering::SeqCst);

        let result = {
            let mut state = self.state.write().await;
            match state.faults.fetch.take() {
                Some(error) => Err(error),
                None => state
                    .groups
                    .get(group_id.as_str())
                    .cloned()
                    .ok_or_else(|| GatewayError::not_found(group_id.odata_key())),
            }
        };
        // Snapshot taken; let concurrent callers read before anyone writes.
        tokio::task::yield_now().await;
        result
    }

    async fn replace_group(&self, target: &GroupTarget, tree: &FilterTree) -> GatewayResult<()> {
        self.calls.replace.fetch_add(1, Ordering::SeqCst);
        let entity = tree.to_value()?;

        let mut state = self.state.write().await;
        if let Some(error) = state.faults.replace.take() {
            return Err(error);
        }
        let slot = state
            .groups
            .get_mut(target.id().as_str())
            .ok_or_else(|| GatewayError::not_found(target.id().odata_key()))?;
        *slot = entity;
        debug!("Replaced filter tree of {}", target);
        Ok(())
    }

    async fn create_group(&self, target: &GroupTarget, tree: &FilterTree) -> GatewayResult<()> {
        self.calls.create_group.fetch_add(1, Ordering::SeqCst);
        let entity = tree.to_value()?;

        let mut state = self.state.write().await;
        if let Some(error) = state.faults.create_group.take() {
            return Err(error);
        }
        if state.groups.contains_key(target.id().as_str()) {
            return Err(GatewayError::api(
                409,
                format!("{} already exists", target.id().odata_key()),
            ));
        }
        state
            .groups
            .insert(target.id().as_str().to_string(), entity);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryGateway {
    async fn create_user(&self, user: &NewUser) -> GatewayResult<Value> {
        self.calls.create_user.fetch_add(1, Ordering::SeqCst);
        let entity = serde_json::to_value(user.to_payload())?;

        let mut state = self.state.write().await;
        if let Some(error) = state.faults.create_user.take() {
            return Err(error);
        }
        if state.users.contains_key(&user.user_id) {
            return Err(GatewayError::api(
                409,
                format!("{} already exists", Self::user_key(&user.user_id)),
            ));
        }
        state.users.insert(user.user_id.clone(), entity.clone());
        Ok(entity)
    }

    async fn get_user(&self, user_id: &str) -> GatewayResult<Option<Value>> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).cloned())
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> GatewayResult<Value> {
        let changes = serde_json::to_value(update)?;

        let mut state = self.state.write().await;
        let entity = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| GatewayError::not_found(Self::user_key(user_id)))?;
        if let (Value::Object(target), Value::Object(fields)) = (&mut *entity, changes) {
            target.extend(fields);
        }
        Ok(entity.clone())
    }

    async fn delete_user(&self, user_id: &str) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        state
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::not_found(Self::user_key(user_id)))
    }

    /// Pages through users in id order. `$filter` expressions are not evaluated.
    async fn list_users(&self, query: &UserQuery) -> GatewayResult<Vec<Value>> {
        let mut state = self.state.write().await;
        if let Some(error) = state.faults.list_users.take() {
            return Err(error);
        }
        Ok(state
            .users
            .values()
            .skip(query.skip as usize)
            .take(query.top as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(id: &str) -> GroupTarget {
        GroupTarget::new(GroupId::new(id).unwrap(), "Admins").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_missing_group() {
        let gateway = InMemoryGateway::new();
        let result = gateway
            .fetch_expanded_group(&GroupId::new("99").unwrap())
            .await;
        assert_eq!(result, Err(GatewayError::not_found("DynamicGroup(99L)")));
    }

    #[tokio::test]
    async fn test_seeded_raw_shape_is_returned_verbatim() {
        let gateway = InMemoryGateway::new();
        let group_id = GroupId::new("5").unwrap();
        let raw = json!({ "groupID": "5", "dgIncludePools": { "filters": {} } });
        gateway.seed_group(&group_id, raw.clone()).await;

        assert_eq!(gateway.fetch_expanded_group(&group_id).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_replace_requires_existing_group() {
        let gateway = InMemoryGateway::new();
        let target = target("5");
        let tree = encode(target.id(), target.name(), &MemberList::new());

        let missing = gateway.replace_group(&target, &tree).await;
        assert!(matches!(missing, Err(GatewayError::NotFound { .. })));

        gateway.create_group(&target, &tree).await.unwrap();
        gateway.replace_group(&target, &tree).await.unwrap();

        let stats = gateway.stats().await;
        assert_eq!(stats.replace_calls, 2);
        assert_eq!(stats.create_group_calls, 1);
        assert_eq!(stats.group_count, 1);
    }

    #[tokio::test]
    async fn test_create_group_conflict() {
        let gateway = InMemoryGateway::new();
        let target = target("5");
        let tree = encode(target.id(), target.name(), &MemberList::new());
        gateway.create_group(&target, &tree).await.unwrap();

        let again = gateway.create_group(&target, &tree).await;
        assert!(matches!(again, Err(GatewayError::Api { status: 409, .. })));
    }

    #[tokio::test]
    async fn test_faults_fire_once() {
        let gateway = InMemoryGateway::new();
        let group_id = GroupId::new("5").unwrap();
        gateway
            .seed_group_members(&group_id, "Admins", &["alice"])
            .await
            .unwrap();

        gateway.fail_next_fetch(GatewayError::Timeout).await;
        assert_eq!(
            gateway.fetch_expanded_group(&group_id).await,
            Err(GatewayError::Timeout)
        );
        assert!(gateway.fetch_expanded_group(&group_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_crud() {
        let gateway = InMemoryGateway::new();
        let user = NewUser::new("U1", "user1").with_first_name("Una");

        let created = gateway.create_user(&user).await.unwrap();
        assert_eq!(created["displayName"], "Una");

        let duplicate = gateway.create_user(&user).await;
        assert!(matches!(duplicate, Err(GatewayError::Api { status: 409, .. })));

        gateway
            .update_user("U1", &UserUpdate::new().with_email("una@example.com"))
            .await
            .unwrap();
        let fetched = gateway.get_user("U1").await.unwrap().unwrap();
        assert_eq!(fetched["email"], "una@example.com");
        assert_eq!(fetched["firstName"], "Una");

        gateway.delete_user("U1").await.unwrap();
        assert_eq!(gateway.get_user("U1").await.unwrap(), None);
        assert!(matches!(
            gateway.delete_user("U1").await,
            Err(GatewayError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_users_paging() {
        let gateway = InMemoryGateway::new();
        for id in ["A", "B", "C"] {
            gateway.seed_user(id, json!({ "userId": id })).await;
        }

        let page = gateway
            .list_users(&UserQuery::new().with_top(2).with_skip(1))
            .await
            .unwrap();
        assert_eq!(page, vec![json!({"userId": "B"}), json!({"userId": "C"})]);
    }

    #[tokio::test]
    async fn test_clear_keeps_counters() {
        let gateway = InMemoryGateway::new();
        let group_id = GroupId::new("5").unwrap();
        gateway
            .seed_group_members(&group_id, "Admins", &[])
            .await
            .unwrap();
        let _ = gateway.fetch_expanded_group(&group_id).await;

        gateway.clear().await;
        let stats = gateway.stats().await;
        assert_eq!(stats.group_count, 0);
        assert_eq!(stats.fetch_calls, 1);
    }
}
