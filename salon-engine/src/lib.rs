//! Salon Engine - appointment scheduling and availability
//!
//! # Overview
//!
//! - **Availability** (`availability`): open slots for a service, staff member and date
//! - **Appointments** (`appointments`): atomic reservation and the lifecycle state machine
//! - **Policy** (`policy`): booking window and cancellation/refund decisions
//! - **Notifications** (`notifications`): when a reminder is due
//! - **Catalog** (`catalog`): read-only view of services and staff
//!
//! # Module Layout
//!
//! ```text
//! salon-engine/src/
//! ├── core/           # configuration
//! ├── availability/   # slot computation (pure)
//! ├── appointments/   # event sourcing, redb storage, per-staff locking
//! ├── policy/         # policy evaluation and the policy source
//! ├── catalog.rs      # catalog seam + in-memory cache
//! ├── notifications.rs
//! └── utils/          # logging, time helpers
//! ```

pub mod appointments;
pub mod availability;
pub mod catalog;
pub mod core;
pub mod notifications;
pub mod policy;
pub mod utils;

// Re-export public types
pub use appointments::{AppointmentStorage, AppointmentsManager, ManagerError, ManagerResult, StaffAvailability};
pub use availability::{Slot, SlotQuery, SlotRejection, compute_slots};
pub use catalog::{Catalog, InMemoryCatalog};
pub use core::EngineConfig;
pub use notifications::next_reminder_due_at;
pub use policy::{PolicyProvider, SharedPolicy, evaluate_cancellation, evaluate_no_show};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_from_config, init_logger_with_file};
