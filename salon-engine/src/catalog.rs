//! Catalog - read access to services and staff members
//!
//! Catalog management (creating services, editing staff) lives elsewhere;
//! the engine only reads through the [`Catalog`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::models::{Service, StaffMember};

/// Read-only view of services and staff
pub trait Catalog: Send + Sync {
    fn service(&self, service_id: &str) -> Option<Service>;

    fn staff(&self, staff_id: &str) -> Option<StaffMember>;

    /// Active staff members able to perform `service`, in the service's order
    fn staff_for_service(&self, service: &Service) -> Vec<StaffMember> {
        service
            .staff_ids
            .iter()
            .filter_map(|id| self.staff(id))
            .filter(|s| s.is_active)
            .collect()
    }
}

/// In-memory catalog cache
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    /// service_id -> Service
    services: Arc<RwLock<HashMap<String, Service>>>,
    /// staff_id -> StaffMember
    staff: Arc<RwLock<HashMap<String, StaffMember>>>,
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("services_count", &self.services.read().len())
            .field("staff_count", &self.staff.read().len())
            .finish()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a service
    pub fn upsert_service(&self, service: Service) {
        self.services.write().insert(service.id.clone(), service);
    }

    /// Insert or replace a staff member (including their weekly schedule)
    pub fn upsert_staff(&self, staff: StaffMember) {
        self.staff.write().insert(staff.id.clone(), staff);
    }

    pub fn remove_service(&self, service_id: &str) -> Option<Service> {
        self.services.write().remove(service_id)
    }

    pub fn services(&self) -> Vec<Service> {
        let mut all: Vec<Service> = self.services.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

impl Catalog for InMemoryCatalog {
    fn service(&self, service_id: &str) -> Option<Service> {
        self.services.read().get(service_id).cloned()
    }

    fn staff(&self, staff_id: &str) -> Option<StaffMember> {
        self.staff.read().get(staff_id).cloned()
    }
}
