//! Policy source - the seam to the policy-admin collaborator
//!
//! Readers always get a copy; appointments freeze the fields they need, so a
//! later `publish` never reaches an existing booking.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::models::SalonPolicy;

/// Supplies the current salon policy
pub trait PolicyProvider: Send + Sync {
    /// Copy of the policy in force right now
    fn current(&self) -> SalonPolicy;
}

/// A fixed policy
impl PolicyProvider for SalonPolicy {
    fn current(&self) -> SalonPolicy {
        self.clone()
    }
}

/// Process-wide policy shared between the engine and the admin collaborator
#[derive(Debug, Clone, Default)]
pub struct SharedPolicy {
    inner: Arc<RwLock<SalonPolicy>>,
}

impl SharedPolicy {
    pub fn new(policy: SalonPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }

    /// Replace the policy; the stored version becomes `previous + 1`
    ///
    /// Returns the version assigned.
    pub fn publish(&self, mut policy: SalonPolicy) -> u64 {
        let mut guard = self.inner.write();
        policy.version = guard.version + 1;
        let version = policy.version;
        *guard = policy;
        tracing::info!(policy_version = version, "Salon policy updated");
        version
    }
}

impl PolicyProvider for SharedPolicy {
    fn current(&self) -> SalonPolicy {
        self.inner.read().clone()
    }
}
