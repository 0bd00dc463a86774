use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::LoanId;

/// registry of per-loan mutual-exclusion primitives
///
/// the registry itself is guarded by a coarse lock so that two concurrent
/// first-time lookups for the same loan end up sharing exactly one mutex.
/// entries are never evicted; loan cardinality is bounded by business volume.
#[derive(Debug, Default)]
pub struct LockManager {
    locks: Mutex<HashMap<LoanId, Arc<Mutex<()>>>>,
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// get the mutex for a key, creating it on first use
    ///
    /// callers hold the returned guard's source for the duration of the
    /// critical section; dropping the guard releases the lock on every exit
    /// path, including error returns
    pub fn lock_for(&self, key: LoanId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(key).or_default().clone()
    }
}
