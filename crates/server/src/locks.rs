//! Per-upload serialization.
//!
//! Two PATCH requests racing on the same upload id could both pass the
//! offset check and corrupt the blob. Every PATCH therefore holds this
//! registry's lock for its id from the record lookup through the final save.
//! HEAD takes a read snapshot and does not lock.

use hoist_core::upload::UploadId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-upload-id async mutexes.
#[derive(Default)]
pub struct UploadLocks {
    inner: Mutex<HashMap<UploadId, Arc<AsyncMutex<()>>>>,
}

impl UploadLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for one upload id.
    ///
    /// The guard owns its mutex, so it stays valid after the registry map is
    /// released. Entries nobody else holds are pruned on the way in to keep
    /// the map bounded by the number of in-flight uploads.
    pub async fn acquire(&self, id: &UploadId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.retain(|_, entry| Arc::strong_count(entry) > 1);
            map.entry(*id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of ids currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_id_serializes() {
        let locks = Arc::new(UploadLocks::new());
        let id = UploadId::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let guard = locks.acquire(&id).await;

        let task = {
            let locks = locks.clone();
            let order = order.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
                order.lock().unwrap().push("second");
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        order.lock().unwrap().push("first");
        drop(guard);

        task.await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn different_ids_are_independent() {
        let locks = UploadLocks::new();
        let _a = locks.acquire(&UploadId::new()).await;
        // Acquiring a different id must not block behind the first guard.
        let _b = locks.acquire(&UploadId::new()).await;
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = UploadLocks::new();
        for _ in 0..8 {
            let guard = locks.acquire(&UploadId::new()).await;
            drop(guard);
        }
        let held = locks.acquire(&UploadId::new()).await;
        assert_eq!(locks.tracked(), 1);
        drop(held);
    }
}
