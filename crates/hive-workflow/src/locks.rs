//! Per-entity serialization of mutating operations.
//!
//! A mutating operation holds the lock for its entity id across
//! read, validate, write and audit, so two writers on the same report or
//! alert run one after the other while writers on different entities
//! proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type Slot = Arc<AsyncMutex<()>>;

/// Keyed async mutex registry. Clones share the registry.
#[derive(Debug, Clone, Default)]
pub struct EntityLocks {
    slots: Arc<Mutex<HashMap<Uuid, Slot>>>,
}

/// Exclusive hold on one entity id; released on drop.
#[derive(Debug)]
pub struct EntityGuard {
    id: Uuid,
    slots: Arc<Mutex<HashMap<Uuid, Slot>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl EntityLocks {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn lock(&self, id: impl Into<Uuid>) -> EntityGuard {
        let id = id.into();
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(id).or_default().clone()
        };
        let guard = slot.lock_owned().await;
        EntityGuard {
            id,
            slots: self.slots.clone(),
            guard: Some(guard),
        }
    }

    /// Ids with a holder or waiter
    pub fn tracked(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for EntityGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        // Release first so a waiter can proceed, then drop the slot if the
        // registry holds the last reference.
        self.guard.take();
        if let Some(slot) = slots.get(&self.id) {
            if Arc::strong_count(slot) == 1 {
                slots.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_serialized() {
        let locks = EntityLocks::new();
        let id = Uuid::from_u128(1);
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let worker = |locks: EntityLocks, inside: Arc<AtomicUsize>, max: Arc<AtomicUsize>| async move {
            let _guard = locks.lock(id).await;
            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
            max.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            inside.fetch_sub(1, Ordering::SeqCst);
        };

        tokio::join!(
            worker(locks.clone(), inside.clone(), max_inside.clone()),
            worker(locks.clone(), inside.clone(), max_inside.clone()),
            worker(locks.clone(), inside.clone(), max_inside.clone()),
        );
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_distinct_ids_do_not_block() {
        let locks = EntityLocks::new();
        let _a = locks.lock(Uuid::from_u128(1)).await;
        let _b = locks.lock(Uuid::from_u128(2)).await;
        assert_eq!(locks.tracked(), 2);
    }
}
