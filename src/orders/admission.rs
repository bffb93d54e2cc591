//! Per zone/date admission gate
//!
//! Order creation reads the same-day count and then inserts. Holding the
//! permit for a `(zone_id, pickup_date)` key across both steps keeps two
//! requests in this process from seeing the same pre-overflow count.
//! Requests served by other processes are not covered.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::ZoneId;

pub type AdmissionKey = (ZoneId, NaiveDate);

type LockMap = DashMap<AdmissionKey, Arc<Mutex<()>>>;

#[derive(Default, Clone)]
pub struct AdmissionGate {
    locks: Arc<LockMap>,
}

/// Held while an order for its key is being admitted.
pub struct AdmissionPermit {
    key: AdmissionKey,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive admission on `(zone_id, pickup_date)`.
    pub async fn acquire(&self, zone_id: ZoneId, pickup_date: NaiveDate) -> AdmissionPermit {
        let key = (zone_id, pickup_date);
        let lock = Arc::clone(self.locks.entry(key).or_default().value());
        let guard = lock.lock_owned().await;
        AdmissionPermit {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        // Release first so the strong count below only sees waiters.
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
