//! Appointment command/event types
//!
//! - Commands: requests to reserve a slot or move an appointment through its lifecycle
//! - Events: immutable facts recorded after command processing
//! - Snapshots: current appointment state computed from the event stream

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{AppointmentCommand, AppointmentCommandPayload};
pub use event::{AppointmentEvent, AppointmentEventType, EventPayload};
pub use snapshot::AppointmentSnapshot;
pub use types::*;
