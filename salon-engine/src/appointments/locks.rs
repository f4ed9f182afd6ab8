//! Per-staff mutual exclusion
//!
//! Every check-then-commit that touches a staff member's calendar runs while
//! holding that staff member's mutex. Different staff members never contend.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

/// Lazily created mutex per staff id
#[derive(Debug, Default, Clone)]
pub struct StaffLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl StaffLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutex guarding `staff_id`'s calendar
    ///
    /// The caller locks the returned handle; the map shard is released
    /// before that, so waiting on one staff member never blocks lookups.
    pub fn for_staff(&self, staff_id: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(staff_id) {
            return lock.clone();
        }
        self.locks
            .entry(staff_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
