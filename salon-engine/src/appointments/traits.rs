//! Command handler and event applier seams
//!
//! ```text
//! CommandAction ──execute(ctx)──► Vec<AppointmentEvent> ──EventAction::apply──► AppointmentSnapshot
//! ```
//!
//! Handlers validate and emit events; they never write. Appliers are pure.

use std::collections::HashMap;

use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, Transition};
use shared::calendar::BusyInterval;
use thiserror::Error;

use super::appliers::*;
use super::storage::{AppointmentStorage, StorageError, date_window};
use crate::availability::SlotRejection;

/// Business rejections raised while handling a command
#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Slot no longer available: {0}")]
    SlotNoLongerAvailable(String),

    #[error("Start time is outside the booking window")]
    OutsideBookingWindow,

    #[error("Staff member is inactive: {0}")]
    StaffInactive(String),

    #[error("Service {service_id} is not offered by staff member {staff_id}")]
    ServiceNotOfferedByStaff { service_id: String, staff_id: String },

    #[error("Cannot {transition} appointment {appointment_id} in status {status}")]
    InvalidTransition {
        appointment_id: String,
        status: AppointmentStatus,
        transition: Transition,
    },

    #[error("Too early to {transition} appointment {appointment_id}")]
    TooEarly {
        appointment_id: String,
        transition: Transition,
    },

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SlotRejection> for AppointmentError {
    fn from(rejection: SlotRejection) -> Self {
        match rejection {
            SlotRejection::OutsideBookingWindow => AppointmentError::OutsideBookingWindow,
            SlotRejection::OffDay => {
                AppointmentError::SlotNoLongerAvailable("staff member is off that day".into())
            }
            SlotRejection::OutsideWorkingHours => {
                AppointmentError::SlotNoLongerAvailable("outside working hours".into())
            }
            SlotRejection::NonexistentLocalTime => {
                AppointmentError::SlotNoLongerAvailable("local time does not exist".into())
            }
            SlotRejection::Overlaps => {
                AppointmentError::SlotNoLongerAvailable("overlaps another appointment".into())
            }
        }
    }
}

/// Reject unless `snapshot.status` is one of `allowed`
pub fn require_status(
    snapshot: &AppointmentSnapshot,
    transition: Transition,
    allowed: &[AppointmentStatus],
) -> Result<(), AppointmentError> {
    if allowed.contains(&snapshot.status) {
        Ok(())
    } else {
        Err(AppointmentError::InvalidTransition {
            appointment_id: snapshot.appointment_id.clone(),
            status: snapshot.status,
            transition,
        })
    }
}

/// Who issued a command, and when
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    /// "now" for every time-dependent rule
    pub timestamp: i64,
}

/// Read access to the open write transaction, plus the working set of snapshots
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a AppointmentStorage,
    sequence: u64,
    /// Snapshots as they were when first loaded in this transaction
    originals: HashMap<String, Option<AppointmentSnapshot>>,
    /// Snapshots changed by applied events
    modified: HashMap<String, AppointmentSnapshot>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a AppointmentStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            sequence: current_sequence,
            originals: HashMap::new(),
            modified: HashMap::new(),
        }
    }

    /// Load an appointment, preferring the copy modified in this context
    pub fn load_snapshot(&mut self, appointment_id: &str) -> Result<AppointmentSnapshot, AppointmentError> {
        if let Some(snapshot) = self.modified.get(appointment_id) {
            return Ok(snapshot.clone());
        }
        let stored = match self.originals.get(appointment_id) {
            Some(stored) => stored.clone(),
            None => {
                let stored = self.storage.get_snapshot_txn(self.txn, appointment_id)?;
                self.originals.insert(appointment_id.to_string(), stored.clone());
                stored
            }
        };
        stored.ok_or_else(|| AppointmentError::AppointmentNotFound(appointment_id.to_string()))
    }

    /// Load an appointment, or start an empty one if it does not exist yet
    pub fn load_or_create(&mut self, appointment_id: &str) -> Result<AppointmentSnapshot, AppointmentError> {
        match self.load_snapshot(appointment_id) {
            Err(AppointmentError::AppointmentNotFound(_)) => {
                Ok(AppointmentSnapshot::new(appointment_id.to_string()))
            }
            other => other,
        }
    }

    pub fn save_snapshot(&mut self, snapshot: AppointmentSnapshot) {
        self.modified.insert(snapshot.appointment_id.clone(), snapshot);
    }

    /// Snapshots changed in this context, with their state before the command
    pub fn changes(&self) -> impl Iterator<Item = (Option<&AppointmentSnapshot>, &AppointmentSnapshot)> {
        self.modified.iter().map(|(id, snapshot)| {
            let original = self.originals.get(id).and_then(Option::as_ref);
            (original, snapshot)
        })
    }

    /// Busy intervals of a staff member that a slot on `date` could overlap,
    /// read inside the transaction
    pub fn busy_intervals(&self, staff_id: &str, date: NaiveDate) -> Result<Vec<BusyInterval>, AppointmentError> {
        let (from, to) = date_window(date);
        Ok(self.storage.busy_between_txn(self.txn, staff_id, from, to)?)
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }
}

/// Turns one command into events
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError>;
}

/// Applies one event to a snapshot; must be pure
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent);
}
