//! Optional in-process serialization of reconciliations per group.
//!
//! Holding the guard for a group for the whole fetch-merge-write cycle closes
//! the lost-update window between callers sharing one [`GroupLocks`]. Callers
//! in other processes are not covered.

use crate::membership::GroupId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per group id.
///
/// An entry lives while some caller holds or waits for its lock. Idle entries
/// are dropped on the next [`acquire`](GroupLocks::acquire).
#[derive(Debug, Clone, Default)]
pub struct GroupLocks {
    locks: Arc<Mutex<HashMap<GroupId, Arc<Mutex<()>>>>>,
}

impl GroupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `group_id`.
    pub async fn acquire(&self, group_id: &GroupId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Only the map references an idle entry.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(group_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of groups whose lock is currently held or awaited.
    pub async fn active_groups(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
