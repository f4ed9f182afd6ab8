//! redb-based storage layer for appointments
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(appointment_id, sequence)` | `AppointmentEvent` | Event stream (append-only) |
//! | `snapshots` | `appointment_id` | `AppointmentSnapshot` | Current appointment state |
//! | `staff_timeline` | `(staff_id, start_at)` | `BusyInterval` | Occupied staff time, by instant |
//! | `staff_busy` | `(staff_id, date, start_at)` | `BusyInterval` | Occupied staff time, by local date |
//! | `processed_commands` | `command_id` | `appointment_id` | Idempotency check |
//! | `sequence_counter` | `"seq"` | `u64` | Global sequence |
//!
//! # Staff busy index
//!
//! One row per non-cancelled appointment in each of two tables. The
//! timeline is keyed by instant and is what [`AppointmentStorage::occupy_interval`]
//! checks: a row overlapping another appointment of the same staff member is
//! refused, whatever local date either was booked under. This is the
//! store-level form of "at most one appointment covers any instant".
//! The date-keyed table only serves per-day listings; the salon time zone can
//! change, so it is never used for conflict checks.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns the
//! transaction is on disk, and a crash never leaves a half-written commit.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::appointment::{AppointmentEvent, AppointmentSnapshot};
use shared::calendar::BusyInterval;
use thiserror::Error;

/// Table for storing events: key = (appointment_id, sequence), value = JSON-serialized AppointmentEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");

/// Table for storing snapshots: key = appointment_id, value = JSON-serialized AppointmentSnapshot
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Staff timeline: key = (staff_id, start_at), value = JSON-serialized BusyInterval
const STAFF_TIMELINE_TABLE: TableDefinition<(&str, i64), &[u8]> =
    TableDefinition::new("staff_timeline");

/// Staff busy listing: key = (staff_id, "YYYY-MM-DD", start_at), value = JSON-serialized BusyInterval
const STAFF_BUSY_TABLE: TableDefinition<(&str, &str, i64), &[u8]> =
    TableDefinition::new("staff_busy");

/// Table for tracking processed commands: key = command_id, value = appointment_id
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, &str> =
    TableDefinition::new("processed_commands");

/// Table for sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Upper bound on one interval's length; a full local day across a DST change is 25h
const MAX_INTERVAL_MILLIS: i64 = 26 * 3_600_000;

/// Widest UTC offset either side of the prime meridian, with margin
const MAX_UTC_OFFSET_MILLIS: i64 = 15 * 3_600_000;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interval conflict: staff {staff_id} already holds {existing} at that time")]
    IntervalConflict { staff_id: String, existing: String },

    #[error("Version conflict on {appointment_id}: expected {expected}, found {found}")]
    VersionConflict {
        appointment_id: String,
        expected: u64,
        found: u64,
    },
}

impl StorageError {
    /// Lost a race against another writer; the whole check-then-commit may be retried
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            StorageError::IntervalConflict { .. } | StorageError::VersionConflict { .. }
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Instant range holding every slot that any time zone can place on `date`
pub fn date_window(date: NaiveDate) -> (i64, i64) {
    let midnight_utc = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (
        midnight_utc - MAX_UTC_OFFSET_MILLIS,
        midnight_utc + 24 * 3_600_000 + MAX_UTC_OFFSET_MILLIS,
    )
}

/// Appointment storage backed by redb
#[derive(Clone)]
pub struct AppointmentStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for AppointmentStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentStorage").finish_non_exhaustive()
    }
}

impl AppointmentStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and throwaway engines)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = write_txn.open_table(STAFF_TIMELINE_TABLE)?;
            let _ = write_txn.open_table(STAFF_BUSY_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// redb allows one writer at a time; this blocks while another write
    /// transaction is open.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Get current sequence (within transaction)
    pub fn get_current_sequence_txn(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Command Idempotency ==========

    /// Appointment produced by an already processed command, if any
    pub fn processed_command(&self, command_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.map(|v| v.value().to_string()))
    }

    /// Same as [`Self::processed_command`], within transaction
    pub fn processed_command_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.map(|v| v.value().to_string()))
    }

    /// Mark a command as processed
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
        appointment_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, appointment_id)?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event
    pub fn store_event(&self, txn: &WriteTransaction, event: &AppointmentEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let key = (event.appointment_id.as_str(), event.sequence);
        let value = serde_json::to_vec(event)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Get all events for an appointment, oldest first
    pub fn get_events_for_appointment(
        &self,
        appointment_id: &str,
    ) -> StorageResult<Vec<AppointmentEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.range((appointment_id, 0u64)..=(appointment_id, u64::MAX))? {
            let (_key, value) = result?;
            let event: AppointmentEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Get events since a given sequence (across all appointments)
    pub fn get_events_since(&self, since_sequence: u64) -> StorageResult<Vec<AppointmentEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let event: AppointmentEvent = serde_json::from_slice(value.value())?;
            if event.sequence > since_sequence {
                events.push(event);
            }
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    // ========== Snapshot Operations ==========

    /// Store a snapshot
    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &AppointmentSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        let value = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.appointment_id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a snapshot by appointment ID
    pub fn get_snapshot(&self, appointment_id: &str) -> StorageResult<Option<AppointmentSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;

        match table.get(appointment_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a snapshot by appointment ID (within transaction)
    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        appointment_id: &str,
    ) -> StorageResult<Option<AppointmentSnapshot>> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;

        match table.get(appointment_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fail with `VersionConflict` unless the stored snapshot is at `expected`
    ///
    /// A missing snapshot counts as version 0.
    pub fn check_version_txn(
        &self,
        txn: &WriteTransaction,
        appointment_id: &str,
        expected: u64,
    ) -> StorageResult<()> {
        let found = self
            .get_snapshot_txn(txn, appointment_id)?
            .map(|s| s.version)
            .unwrap_or(0);
        if found != expected {
            return Err(StorageError::VersionConflict {
                appointment_id: appointment_id.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    // ========== Staff Busy Index ==========

    /// Record `interval` as occupied staff time
    ///
    /// Fails with `IntervalConflict` if it overlaps an interval held by a
    /// different appointment of the same staff member. `date` only files the
    /// row for per-day listings.
    pub fn occupy_interval(
        &self,
        txn: &WriteTransaction,
        staff_id: &str,
        date: NaiveDate,
        interval: &BusyInterval,
    ) -> StorageResult<()> {
        let mut timeline = txn.open_table(STAFF_TIMELINE_TABLE)?;

        let from = interval.start_at.saturating_sub(MAX_INTERVAL_MILLIS);
        for result in timeline.range((staff_id, from)..(staff_id, interval.end_at))? {
            let (_key, value) = result?;
            let held: BusyInterval = serde_json::from_slice(value.value())?;
            if held.appointment_id != interval.appointment_id
                && held.overlaps(interval.start_at, interval.end_at)
            {
                return Err(StorageError::IntervalConflict {
                    staff_id: staff_id.to_string(),
                    existing: held.appointment_id,
                });
            }
        }

        let value = serde_json::to_vec(interval)?;
        timeline.insert((staff_id, interval.start_at), value.as_slice())?;

        let date = date_key(date);
        let mut listing = txn.open_table(STAFF_BUSY_TABLE)?;
        listing.insert((staff_id, date.as_str(), interval.start_at), value.as_slice())?;
        Ok(())
    }

    /// Remove an occupied interval; returns whether a row was removed
    pub fn release_interval(
        &self,
        txn: &WriteTransaction,
        staff_id: &str,
        date: NaiveDate,
        start_at: i64,
    ) -> StorageResult<bool> {
        let mut timeline = txn.open_table(STAFF_TIMELINE_TABLE)?;
        let removed = timeline.remove((staff_id, start_at))?.is_some();

        let date = date_key(date);
        let mut listing = txn.open_table(STAFF_BUSY_TABLE)?;
        let listed = listing.remove((staff_id, date.as_str(), start_at))?.is_some();
        Ok(removed || listed)
    }

    /// Busy intervals of a staff member overlapping `[from, to)`, ascending by start
    pub fn busy_between(&self, staff_id: &str, from: i64, to: i64) -> StorageResult<Vec<BusyInterval>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STAFF_TIMELINE_TABLE)?;

        let mut intervals = Vec::new();
        let scan_from = from.saturating_sub(MAX_INTERVAL_MILLIS);
        for result in table.range((staff_id, scan_from)..(staff_id, to))? {
            let (_key, value) = result?;
            let held: BusyInterval = serde_json::from_slice(value.value())?;
            if held.overlaps(from, to) {
                intervals.push(held);
            }
        }
        Ok(intervals)
    }

    /// Busy intervals of a staff member overlapping `[from, to)` (within transaction)
    pub fn busy_between_txn(
        &self,
        txn: &WriteTransaction,
        staff_id: &str,
        from: i64,
        to: i64,
    ) -> StorageResult<Vec<BusyInterval>> {
        let table = txn.open_table(STAFF_TIMELINE_TABLE)?;

        let mut intervals = Vec::new();
        let scan_from = from.saturating_sub(MAX_INTERVAL_MILLIS);
        for result in table.range((staff_id, scan_from)..(staff_id, to))? {
            let (_key, value) = result?;
            let held: BusyInterval = serde_json::from_slice(value.value())?;
            if held.overlaps(from, to) {
                intervals.push(held);
            }
        }
        Ok(intervals)
    }

    /// Busy intervals of a staff member on a local date, ascending by start
    pub fn busy_intervals(&self, staff_id: &str, date: NaiveDate) -> StorageResult<Vec<BusyInterval>> {
        let date = date_key(date);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STAFF_BUSY_TABLE)?;

        let mut intervals = Vec::new();
        for result in table.range((staff_id, date.as_str(), i64::MIN)..=(staff_id, date.as_str(), i64::MAX))? {
            let (_key, value) = result?;
            intervals.push(serde_json::from_slice(value.value())?);
        }
        Ok(intervals)
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let events_table = read_txn.open_table(EVENTS_TABLE)?;
        let snapshots_table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        let busy_table = read_txn.open_table(STAFF_TIMELINE_TABLE)?;
        let commands_table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        let seq_table = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            event_count: events_table.len()?,
            appointment_count: snapshots_table.len()?,
            busy_interval_count: busy_table.len()?,
            processed_command_count: commands_table.len()?,
            current_sequence: seq_table
                .get(SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub event_count: u64,
    pub appointment_count: u64,
    pub busy_interval_count: u64,
    pub processed_command_count: u64,
    pub current_sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::appointment::{AppointmentEventType, EventPayload};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
    }

    fn create_test_event(appointment_id: &str, sequence: u64) -> AppointmentEvent {
        AppointmentEvent::new(
            sequence,
            appointment_id.to_string(),
            "test_op".to_string(),
            shared::util::new_id(),
            1_000,
            AppointmentEventType::Confirmed,
            EventPayload::Confirmed,
        )
    }

    #[test]
    fn test_sequence_roundtrip() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        assert_eq!(storage.get_current_sequence().unwrap(), 0);

        let txn = storage.begin_write().unwrap();
        storage.set_sequence(&txn, 7).unwrap();
        assert_eq!(storage.get_current_sequence_txn(&txn).unwrap(), 7);
        txn.commit().unwrap();

        assert_eq!(storage.get_current_sequence().unwrap(), 7);
    }

    #[test]
    fn test_command_idempotency() {
        let storage = AppointmentStorage::open_in_memory().unwrap();

        assert_eq!(storage.processed_command("cmd-123").unwrap(), None);

        let txn = storage.begin_write().unwrap();
        storage.mark_command_processed(&txn, "cmd-123", "apt-1").unwrap();
        txn.commit().unwrap();

        assert_eq!(
            storage.processed_command("cmd-123").unwrap().as_deref(),
            Some("apt-1")
        );
    }

    #[test]
    fn test_events_are_scoped_and_ordered() {
        let storage = AppointmentStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_event(&txn, &create_test_event("apt-1", 3)).unwrap();
        storage.store_event(&txn, &create_test_event("apt-2", 2)).unwrap();
        storage.store_event(&txn, &create_test_event("apt-1", 1)).unwrap();
        txn.commit().unwrap();

        let events = storage.get_events_for_appointment("apt-1").unwrap();
        assert_eq!(events.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![1, 3]);

        let since = storage.get_events_since(1).unwrap();
        assert_eq!(since.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_occupy_rejects_overlap_for_same_staff_only() {
        let storage = AppointmentStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-1", 1_000, 2_000))
            .unwrap();

        let err = storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-2", 1_500, 2_500))
            .unwrap_err();
        assert!(err.is_contention());
        assert!(matches!(err, StorageError::IntervalConflict { ref existing, .. } if existing == "apt-1"));

        // other staff member, same time
        storage
            .occupy_interval(&txn, "ben", date(), &BusyInterval::new("apt-3", 1_500, 2_500))
            .unwrap();
        // back to back
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-4", 2_000, 3_000))
            .unwrap();
        txn.commit().unwrap();

        let ana = storage.busy_intervals("ana", date()).unwrap();
        assert_eq!(ana.len(), 2);
        assert_eq!(ana[0].appointment_id, "apt-1");
        assert_eq!(ana[1].appointment_id, "apt-4");
    }

    #[test]
    fn test_release_frees_the_time() {
        let storage = AppointmentStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-1", 1_000, 2_000))
            .unwrap();
        assert!(storage.release_interval(&txn, "ana", date(), 1_000).unwrap());
        assert!(!storage.release_interval(&txn, "ana", date(), 1_000).unwrap());
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-2", 1_000, 2_000))
            .unwrap();
        txn.commit().unwrap();

        let busy = storage.busy_intervals("ana", date()).unwrap();
        assert_eq!(busy, vec![BusyInterval::new("apt-2", 1_000, 2_000)]);
    }

    #[test]
    fn test_overlap_is_checked_across_local_dates() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let tuesday = date().succ_opt().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .occupy_interval(&txn, "ana", tuesday, &BusyInterval::new("apt-1", 1_000, 2_000))
            .unwrap();
        // same instants filed under another local date
        let err = storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-2", 1_000, 2_000))
            .unwrap_err();
        assert!(matches!(err, StorageError::IntervalConflict { ref existing, .. } if existing == "apt-1"));
        txn.commit().unwrap();

        assert!(storage.busy_intervals("ana", date()).unwrap().is_empty());
        assert_eq!(storage.busy_intervals("ana", tuesday).unwrap().len(), 1);
    }

    #[test]
    fn test_long_interval_blocks_later_start() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let hour = 3_600_000;

        let txn = storage.begin_write().unwrap();
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-1", 0, 20 * hour))
            .unwrap();
        let err = storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-2", 19 * hour, 21 * hour))
            .unwrap_err();
        assert!(err.is_contention());
        txn.commit().unwrap();
    }

    #[test]
    fn test_busy_between_returns_overlapping_only() {
        let storage = AppointmentStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-1", 1_000, 2_000))
            .unwrap();
        storage
            .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-2", 3_000, 4_000))
            .unwrap();
        storage
            .occupy_interval(&txn, "ben", date(), &BusyInterval::new("apt-3", 1_000, 4_000))
            .unwrap();
        assert_eq!(storage.busy_between_txn(&txn, "ana", 1_500, 3_000).unwrap().len(), 1);
        txn.commit().unwrap();

        let all = storage.busy_between("ana", 0, 10_000).unwrap();
        assert_eq!(
            all.iter().map(|b| b.appointment_id.as_str()).collect::<Vec<_>>(),
            vec!["apt-1", "apt-2"]
        );
        let tail = storage.busy_between("ana", 1_999, 3_001).unwrap();
        assert_eq!(tail.len(), 2);
        assert!(storage.busy_between("ana", 2_000, 3_000).unwrap().is_empty());
    }

    #[test]
    fn test_date_window_covers_every_offset() {
        let (from, to) = date_window(date());
        let midnight = chrono::Utc
            .with_ymd_and_hms(2026, 3, 16, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        // local midnight at UTC+14 and local end of day at UTC-12
        assert!(from <= midnight - 14 * 3_600_000);
        assert!(to >= midnight + 36 * 3_600_000);
    }

    #[test]
    fn test_version_check() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let mut snapshot = AppointmentSnapshot::new("apt-1".to_string());
        snapshot.version = 2;

        let txn = storage.begin_write().unwrap();
        storage.check_version_txn(&txn, "apt-1", 0).unwrap();
        storage.store_snapshot(&txn, &snapshot).unwrap();
        storage.check_version_txn(&txn, "apt-1", 2).unwrap();
        let err = storage.check_version_txn(&txn, "apt-1", 1).unwrap_err();
        assert!(matches!(err, StorageError::VersionConflict { expected: 1, found: 2, .. }));
    }

    #[test]
    fn test_reopen_from_disk_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("appointments.redb");

        {
            let storage = AppointmentStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage.store_snapshot(&txn, &AppointmentSnapshot::new("apt-1".into())).unwrap();
            storage
                .occupy_interval(&txn, "ana", date(), &BusyInterval::new("apt-1", 1_000, 2_000))
                .unwrap();
            storage.set_sequence(&txn, 4).unwrap();
            txn.commit().unwrap();
        }

        let storage = AppointmentStorage::open(&path).unwrap();
        assert!(storage.get_snapshot("apt-1").unwrap().is_some());
        assert_eq!(storage.busy_intervals("ana", date()).unwrap().len(), 1);
        let stats = storage.get_stats().unwrap();
        assert_eq!(stats.current_sequence, 4);
        assert_eq!(stats.appointment_count, 1);
        assert_eq!(stats.busy_interval_count, 1);
    }
}
