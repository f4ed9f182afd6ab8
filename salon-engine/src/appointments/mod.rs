//! Appointment Event Sourcing Module
//!
//! Reservations and lifecycle transitions, recorded as events:
//!
//! - **manager**: Core AppointmentsManager for command processing and queries
//! - **storage**: redb-based persistence for events, snapshots and the staff busy index
//! - **actions**: one handler per command, producing events
//! - **appliers**: one applier per event, mutating snapshots
//! - **locks**: per-staff mutual exclusion
//!
//! # Architecture
//!
//! ```text
//! Command → AppointmentsManager → Event → Storage (redb)
//!                 ↓                          ↓
//!              Broadcast           Snapshot + Busy Index Update
//!                 ↓
//!           All Subscribers
//! ```
//!
//! # Data Flow
//!
//! 1. Caller submits an AppointmentCommand
//! 2. AppointmentsManager takes the staff member's lock
//! 3. The action re-checks availability and policy inside the write transaction
//! 4. AppointmentEvent is generated with a global sequence
//! 5. Events, snapshot and busy index are persisted in one commit
//! 6. Event is broadcast to all subscribers
//! 7. CommandResponse (or the snapshot) is returned

pub mod actions;
pub mod appliers;
pub mod locks;
pub mod manager;
pub mod storage;
pub mod traits;

// Re-exports
pub use locks::StaffLocks;
pub use manager::{AppointmentsManager, ManagerError, ManagerResult, StaffAvailability};
pub use storage::{AppointmentStorage, StorageError, StorageResult, StorageStats};
pub use traits::AppointmentError;

// Re-export shared types for convenience
pub use shared::appointment::{
    AppointmentCommand, AppointmentCommandPayload, AppointmentEvent, AppointmentEventType,
    AppointmentSnapshot, AppointmentStatus, BookingTerms, CancellationOutcome, CommandError,
    CommandErrorCode, CommandResponse, EventPayload, Transition,
};
