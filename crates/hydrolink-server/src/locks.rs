//! Per-resource serialization of reconciliation runs.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per resource id. Concurrent requests for the same resource
/// queue up; requests for different resources proceed independently.
///
/// Entries are never evicted; the set of resource ids a deployment sees is
/// small and each entry is a single `Arc<Mutex<()>>`.
#[derive(Debug, Default, Clone)]
pub struct ResourceLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one resource, waiting behind any in-flight run.
    pub async fn acquire(&self, resource_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(resource_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_resource_is_serialized() {
        let locks = ResourceLocks::new();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("r1").await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two runs held the same resource lock");
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_resources_do_not_block_each_other() {
        let locks = ResourceLocks::new();
        let _a = locks.acquire("r1").await;
        // Must not deadlock: a different resource has its own lock.
        let _b = locks.acquire("r2").await;
    }
}
