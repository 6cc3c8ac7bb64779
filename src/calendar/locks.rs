//! Per-period serialization of reservation writes.
//!
//! The conflict check and the reservation insert must not interleave for
//! the same period. Locks are process-local: several processes sharing one
//! store can still race.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Async mutex per period id. An entry lives only while someone holds or
/// waits on it.
#[derive(Debug, Default)]
pub struct PeriodLocks {
    locks: Arc<LockMap>,
}

/// Exclusive access to one period. Releasing the last handle removes the
/// period's map entry.
#[derive(Debug)]
pub struct PeriodGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
    period_id: String,
}

impl PeriodLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `period_id`
    pub async fn acquire(&self, period_id: &str) -> PeriodGuard {
        // Clone the Arc out so the map shard is not held across the await
        let lock = self
            .locks
            .entry(period_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        PeriodGuard {
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
            period_id: period_id.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for PeriodGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Waiters hold their own clone of the Arc, so a count of one means
        // the map is the only owner left.
        self.locks
            .remove_if(&self.period_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
