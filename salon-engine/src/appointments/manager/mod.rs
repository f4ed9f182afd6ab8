//! AppointmentsManager - command processing, slot claims and queries
//!
//! This module handles:
//! - Command validation and processing
//! - Per-staff serialization of every calendar change
//! - Event generation with global sequence numbers
//! - Persistence to redb (one transaction per command)
//! - Event broadcasting
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Resolve target staff member (and expected appointment version)
//!     ├─ 3. Read catalog entries and the current policy
//!     ├─ 4. Lock the staff member
//!     ├─ 5. Begin write transaction, re-check idempotency and version
//!     ├─ 6. Convert command to action and execute (re-reads busy intervals)
//!     ├─ 7. Apply events to snapshots via EventApplier
//!     ├─ 8. Persist events, snapshots and the staff busy index
//!     ├─ 9. Mark command processed, commit
//!     ├─ 10. Broadcast event(s)
//!     └─ 11. Return response
//! ```
//!
//! Steps 2-9 are retried up to `max_commit_attempts` times when the store
//! reports contention.

mod error;
pub use error::*;

use std::sync::Arc;

use chrono::NaiveDate;
use redb::WriteTransaction;
use serde::Serialize;
use shared::appointment::{
    AppointmentCommand, AppointmentCommandPayload, AppointmentEvent, AppointmentSnapshot, CommandResponse,
};
use shared::calendar::BusyInterval;
use shared::models::{CustomerInfo, NotificationPreference, Service, StaffMember};
use tokio::sync::broadcast;

use super::actions::{ActionInputs, CommandAction};
use super::appliers::EventAction;
use super::locks::StaffLocks;
use super::storage::{AppointmentStorage, StorageError, date_window};
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier};
use crate::availability::{Slot, SlotQuery};
use crate::catalog::Catalog;
use crate::core::EngineConfig;
use crate::notifications::next_reminder_due_at;
use crate::policy::PolicyProvider;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Operator recorded by the typed helpers
pub const SYSTEM_OPERATOR: &str = "system";

/// Open slots of one staff member
#[derive(Debug, Clone, Serialize)]
pub struct StaffAvailability {
    pub staff_id: String,
    pub staff_name: String,
    pub slots: Vec<Slot>,
}

/// Which calendar a command touches
struct Target {
    staff_id: String,
    /// Existing appointment and the version it was read at
    expected: Option<(String, u64)>,
    service_id: String,
}

/// Result of one processed command
struct Processed {
    appointment_id: String,
    events: Vec<AppointmentEvent>,
    snapshot: Option<AppointmentSnapshot>,
    duplicate: bool,
}

impl Processed {
    fn duplicate(appointment_id: String) -> Self {
        Self {
            appointment_id,
            events: vec![],
            snapshot: None,
            duplicate: true,
        }
    }
}

/// AppointmentsManager for command processing
#[derive(Clone)]
pub struct AppointmentsManager {
    storage: AppointmentStorage,
    catalog: Arc<dyn Catalog>,
    policy: Arc<dyn PolicyProvider>,
    locks: StaffLocks,
    event_tx: broadcast::Sender<AppointmentEvent>,
    config: EngineConfig,
}

impl std::fmt::Debug for AppointmentsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentsManager")
            .field("storage", &"<AppointmentStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("locked_staff", &self.locks.len())
            .field("config", &self.config)
            .finish()
    }
}

impl AppointmentsManager {
    /// Open the database under `config.data_dir` and build a manager
    pub fn new(
        config: EngineConfig,
        catalog: Arc<dyn Catalog>,
        policy: Arc<dyn PolicyProvider>,
    ) -> ManagerResult<Self> {
        let storage = AppointmentStorage::open(config.db_path())?;
        tracing::info!(db_path = %config.db_path().display(), "AppointmentsManager started");
        Ok(Self::with_storage(storage, config, catalog, policy))
    }

    /// Build a manager over existing storage
    pub fn with_storage(
        storage: AppointmentStorage,
        config: EngineConfig,
        catalog: Arc<dyn Catalog>,
        policy: Arc<dyn PolicyProvider>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            catalog,
            policy,
            locks: StaffLocks::new(),
            event_tx,
            config,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<AppointmentEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &AppointmentStorage {
        &self.storage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Command Path ==========

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: AppointmentCommand) -> CommandResponse {
        match self.process_command(&cmd) {
            Ok(processed) => {
                let appointment_id = Some(processed.appointment_id.clone());
                let duplicate = processed.duplicate;
                self.broadcast(processed.events);
                if duplicate {
                    CommandResponse::duplicate(cmd.command_id, appointment_id)
                } else {
                    CommandResponse::success(cmd.command_id, appointment_id)
                }
            }
            Err(err) => CommandResponse::error(cmd.command_id, err.into()),
        }
    }

    /// Execute a command and return the resulting appointment
    ///
    /// A re-submitted command returns the appointment as it is now.
    pub fn submit(&self, cmd: AppointmentCommand) -> ManagerResult<AppointmentSnapshot> {
        let processed = self.process_command(&cmd)?;
        let appointment_id = processed.appointment_id;
        let snapshot = processed.snapshot;
        self.broadcast(processed.events);

        match snapshot {
            Some(snapshot) => Ok(snapshot),
            None => self
                .storage
                .get_snapshot(&appointment_id)?
                .ok_or(ManagerError::AppointmentNotFound(appointment_id)),
        }
    }

    fn broadcast(&self, events: Vec<AppointmentEvent>) {
        for event in events {
            if self.event_tx.send(event).is_err() {
                tracing::debug!("Event broadcast skipped: no active receivers");
                break;
            }
        }
    }

    /// Idempotency check, then the check-then-commit loop
    fn process_command(&self, cmd: &AppointmentCommand) -> ManagerResult<Processed> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        if let Some(appointment_id) = self.storage.processed_command(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok(Processed::duplicate(appointment_id));
        }

        let attempts = self.config.max_commit_attempts.max(1);
        let mut last_contention = None;
        for attempt in 1..=attempts {
            match self.try_process(cmd) {
                Err(ManagerError::Unavailable(e)) if e.is_contention() => {
                    tracing::warn!(command_id = %cmd.command_id, attempt, error = %e, "Commit contention, retrying");
                    last_contention = Some(e);
                }
                Err(err) => {
                    if let ManagerError::SlotNoLongerAvailable(reason) = &err {
                        tracing::warn!(command_id = %cmd.command_id, reason = %reason, "Slot claim rejected");
                    } else if err.is_rejection() {
                        tracing::debug!(command_id = %cmd.command_id, error = %err, "Command rejected");
                    } else {
                        tracing::error!(command_id = %cmd.command_id, error = %err, "Command failed");
                    }
                    return Err(err);
                }
                ok => return ok,
            }
        }

        tracing::warn!(command_id = %cmd.command_id, attempts, "Contention persisted after all attempts");
        match last_contention {
            Some(e) if !cmd.payload.claims_slot() => Err(ManagerError::Unavailable(e)),
            _ => Err(ManagerError::SlotNoLongerAvailable(format!(
                "lost the race for this slot after {attempts} attempts"
            ))),
        }
    }

    /// One check-then-commit attempt
    fn try_process(&self, cmd: &AppointmentCommand) -> ManagerResult<Processed> {
        // 1. Resolve the calendar this command touches and read what the action needs
        let target = self.resolve_target(cmd)?;
        let inputs = self.load_inputs(cmd, &target)?;
        let action = CommandAction::from_command(cmd, inputs)?;

        // 2. Serialize against every other change to this staff member's calendar
        let lock = self.locks.for_staff(&target.staff_id);
        let _guard = lock.lock();

        // 3. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if let Some(appointment_id) = self.storage.processed_command_txn(&txn, &cmd.command_id)? {
            return Ok(Processed::duplicate(appointment_id));
        }
        if let Some((appointment_id, version)) = &target.expected {
            self.storage.check_version_txn(&txn, appointment_id, *version)?;
        }

        // 4. Execute
        let current_sequence = self.storage.get_current_sequence_txn(&txn)?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator_id.clone(),
            timestamp: cmd.timestamp,
        };
        let events = action.execute(&mut ctx, &metadata)?;

        // 5. Apply events to snapshots
        for event in &events {
            let mut snapshot = ctx.load_or_create(&event.appointment_id)?;
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
            ctx.save_snapshot(snapshot);
        }

        // 6. Persist events, snapshots and busy index
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }
        for (original, snapshot) in ctx.changes() {
            self.sync_busy_index(&txn, original, snapshot)?;
            self.storage.store_snapshot(&txn, snapshot)?;
        }

        // 7. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 8. Mark command processed and commit
        let appointment_id = match (events.first(), &target.expected) {
            (Some(event), _) => event.appointment_id.clone(),
            (None, Some((id, _))) => id.clone(),
            (None, None) => {
                return Err(ManagerError::InvalidRequest("command produced no appointment".into()));
            }
        };
        self.storage
            .mark_command_processed(&txn, &cmd.command_id, &appointment_id)?;
        let snapshot = ctx.load_snapshot(&appointment_id).ok();
        drop(ctx);
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            command_id = %cmd.command_id,
            appointment_id = %appointment_id,
            staff_id = %target.staff_id,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok(Processed {
            appointment_id,
            events,
            snapshot,
            duplicate: false,
        })
    }

    fn resolve_target(&self, cmd: &AppointmentCommand) -> ManagerResult<Target> {
        if let AppointmentCommandPayload::Reserve {
            service_id, staff_id, ..
        } = &cmd.payload
        {
            return Ok(Target {
                staff_id: staff_id.clone(),
                expected: None,
                service_id: service_id.clone(),
            });
        }

        let appointment_id = cmd
            .payload
            .appointment_id()
            .ok_or_else(|| ManagerError::InvalidRequest("command names no appointment".into()))?;
        let snapshot = self
            .storage
            .get_snapshot(appointment_id)?
            .ok_or_else(|| ManagerError::AppointmentNotFound(appointment_id.to_string()))?;

        Ok(Target {
            staff_id: snapshot.staff_id,
            expected: Some((snapshot.appointment_id, snapshot.version)),
            service_id: snapshot.service_id,
        })
    }

    fn load_inputs(&self, cmd: &AppointmentCommand, target: &Target) -> ManagerResult<ActionInputs> {
        let (service, staff) = if cmd.payload.claims_slot() {
            (
                Some(self.lookup_service(&target.service_id)?),
                Some(self.lookup_staff(&target.staff_id)?),
            )
        } else {
            (None, None)
        };

        Ok(ActionInputs {
            new_appointment_id: shared::util::new_id(),
            service,
            staff,
            policy: self.policy.current(),
            begin_tolerance_minutes: self.config.begin_tolerance_minutes,
        })
    }

    /// Keep the staff busy index in step with a changed snapshot
    ///
    /// Releases the old interval before occupying the new one, inside the
    /// same transaction: a reschedule never holds both or neither.
    fn sync_busy_index(
        &self,
        txn: &WriteTransaction,
        original: Option<&AppointmentSnapshot>,
        updated: &AppointmentSnapshot,
    ) -> ManagerResult<()> {
        let before = original.filter(|s| s.status.occupies_slot());
        let after = Some(updated).filter(|s| s.status.occupies_slot());

        if let (Some(b), Some(a)) = (before, after)
            && b.staff_id == a.staff_id
            && b.date == a.date
            && b.start_at == a.start_at
            && b.end_at == a.end_at
        {
            return Ok(());
        }

        if let Some(b) = before
            && !self.storage.release_interval(txn, &b.staff_id, b.date, b.start_at)?
        {
            tracing::warn!(appointment_id = %b.appointment_id, "Busy interval was already released");
        }
        if let Some(a) = after {
            self.storage
                .occupy_interval(txn, &a.staff_id, a.date, &a.busy_interval())?;
        }
        Ok(())
    }

    fn lookup_service(&self, service_id: &str) -> ManagerResult<Service> {
        self.catalog
            .service(service_id)
            .ok_or_else(|| ManagerError::ServiceNotFound(service_id.to_string()))
    }

    fn lookup_staff(&self, staff_id: &str) -> ManagerResult<StaffMember> {
        self.catalog
            .staff(staff_id)
            .ok_or_else(|| ManagerError::StaffNotFound(staff_id.to_string()))
    }

    // ========== Typed Commands ==========

    /// Claim a slot and create a PENDING appointment
    pub fn reserve(
        &self,
        service_id: &str,
        staff_id: &str,
        date: NaiveDate,
        start_minute: u32,
        customer: CustomerInfo,
        now: i64,
    ) -> ManagerResult<AppointmentSnapshot> {
        self.submit(
            AppointmentCommand::new(
                SYSTEM_OPERATOR,
                AppointmentCommandPayload::Reserve {
                    service_id: service_id.to_string(),
                    staff_id: staff_id.to_string(),
                    date,
                    start_minute,
                    customer,
                    notes: None,
                },
            )
            .at(now),
        )
    }

    pub fn record_deposit_payment(&self, appointment_id: &str, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::RecordDepositPayment {
                appointment_id: appointment_id.to_string(),
            },
            now,
        )
    }

    pub fn confirm(&self, appointment_id: &str, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::Confirm {
                appointment_id: appointment_id.to_string(),
            },
            now,
        )
    }

    pub fn begin(&self, appointment_id: &str, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::Begin {
                appointment_id: appointment_id.to_string(),
            },
            now,
        )
    }

    pub fn complete(&self, appointment_id: &str, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::Complete {
                appointment_id: appointment_id.to_string(),
            },
            now,
        )
    }

    /// Move an appointment to another slot with the same staff member
    pub fn reschedule(
        &self,
        appointment_id: &str,
        new_date: NaiveDate,
        new_start_minute: u32,
        now: i64,
    ) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::Reschedule {
                appointment_id: appointment_id.to_string(),
                new_date,
                new_start_minute,
            },
            now,
        )
    }

    pub fn cancel(
        &self,
        appointment_id: &str,
        reason: Option<String>,
        now: i64,
    ) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::Cancel {
                appointment_id: appointment_id.to_string(),
                reason,
            },
            now,
        )
    }

    pub fn mark_no_show(&self, appointment_id: &str, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit_for(
            AppointmentCommandPayload::MarkNoShow {
                appointment_id: appointment_id.to_string(),
            },
            now,
        )
    }

    fn submit_for(&self, payload: AppointmentCommandPayload, now: i64) -> ManagerResult<AppointmentSnapshot> {
        self.submit(AppointmentCommand::new(SYSTEM_OPERATOR, payload).at(now))
    }

    // ========== Public Query Methods ==========

    /// Open slots for one staff member and service on `date`
    pub fn available_slots(
        &self,
        service_id: &str,
        staff_id: &str,
        date: NaiveDate,
        now: i64,
    ) -> ManagerResult<Vec<Slot>> {
        let service = self.lookup_service(service_id)?;
        let staff = self.lookup_staff(staff_id)?;
        if !service.is_offered_by(&staff.id) {
            return Err(ManagerError::ServiceNotOfferedByStaff {
                service_id: service.id,
                staff_id: staff.id,
            });
        }
        let policy = self.policy.current();
        let (from, to) = date_window(date);
        let busy = self.storage.busy_between(&staff.id, from, to)?;

        let query = SlotQuery {
            service: &service,
            staff: &staff,
            date,
            busy: &busy,
            now,
            policy: &policy,
            granularity_minutes: self.config.slot_granularity_minutes,
        };
        Ok(query.slots().collect())
    }

    /// Open slots for every active staff member offering the service
    pub fn available_slots_for_service(
        &self,
        service_id: &str,
        date: NaiveDate,
        now: i64,
    ) -> ManagerResult<Vec<StaffAvailability>> {
        let service = self.lookup_service(service_id)?;
        let policy = self.policy.current();
        let (from, to) = date_window(date);

        let mut result = Vec::new();
        for staff in self.catalog.staff_for_service(&service) {
            let busy = self.storage.busy_between(&staff.id, from, to)?;
            let query = SlotQuery {
                service: &service,
                staff: &staff,
                date,
                busy: &busy,
                now,
                policy: &policy,
                granularity_minutes: self.config.slot_granularity_minutes,
            };
            let slots: Vec<Slot> = query.slots().collect();
            result.push(StaffAvailability {
                staff_id: staff.id,
                staff_name: staff.name,
                slots,
            });
        }
        Ok(result)
    }

    /// Get an appointment by ID
    pub fn get_appointment(&self, appointment_id: &str) -> ManagerResult<Option<AppointmentSnapshot>> {
        Ok(self.storage.get_snapshot(appointment_id)?)
    }

    /// Non-cancelled appointments of a staff member on a date, ascending by start
    pub fn appointments_for_staff_on(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> ManagerResult<Vec<AppointmentSnapshot>> {
        let mut appointments = Vec::new();
        for interval in self.storage.busy_intervals(staff_id, date)? {
            match self.storage.get_snapshot(&interval.appointment_id)? {
                Some(snapshot) => appointments.push(snapshot),
                None => {
                    tracing::warn!(appointment_id = %interval.appointment_id, "Busy interval without appointment");
                }
            }
        }
        Ok(appointments)
    }

    /// Occupied time of a staff member on a date
    pub fn busy_intervals(&self, staff_id: &str, date: NaiveDate) -> ManagerResult<Vec<BusyInterval>> {
        Ok(self.storage.busy_intervals(staff_id, date)?)
    }

    /// Get all events for an appointment
    pub fn events_for(&self, appointment_id: &str) -> ManagerResult<Vec<AppointmentEvent>> {
        Ok(self.storage.get_events_for_appointment(appointment_id)?)
    }

    /// Get events since a given sequence
    pub fn events_since(&self, since_sequence: u64) -> ManagerResult<Vec<AppointmentEvent>> {
        Ok(self.storage.get_events_since(since_sequence)?)
    }

    /// When the next reminder for an appointment is due
    pub fn reminder_due_at(
        &self,
        appointment_id: &str,
        preference: &NotificationPreference,
    ) -> ManagerResult<Option<i64>> {
        let snapshot = self
            .storage
            .get_snapshot(appointment_id)?
            .ok_or_else(|| ManagerError::AppointmentNotFound(appointment_id.to_string()))?;
        Ok(next_reminder_due_at(&snapshot, preference))
    }

    /// Rebuild a snapshot from events (for verification)
    pub fn rebuild_snapshot(&self, appointment_id: &str) -> ManagerResult<AppointmentSnapshot> {
        let events = self.storage.get_events_for_appointment(appointment_id)?;
        if events.is_empty() {
            return Err(ManagerError::AppointmentNotFound(appointment_id.to_string()));
        }

        let mut snapshot = AppointmentSnapshot::new(appointment_id.to_string());
        for event in &events {
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests;
