//! Slot computation
//!
//! A [`SlotQuery`] bundles everything a slot decision depends on. It is a
//! plain value: [`SlotQuery::slots`] returns a fresh lazy iterator on every
//! call, and the same query always yields the same slots.
//!
//! # Candidate generation
//!
//! ```text
//! rule.start ── +g ── +g ── ... ── rule.end - duration
//!    │
//!    ├─ drop if the local time does not exist (DST gap)
//!    ├─ drop if outside [now + min_advance, now + max_advance]
//!    └─ drop if [start, start + duration) overlaps a busy interval
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use shared::calendar::{BusyInterval, MinuteRange};
use shared::models::{SalonPolicy, Service, StaffMember};
use shared::util::minutes_to_millis;

use crate::policy::within_booking_window;
use crate::utils::time::local_minute_to_millis;

/// A bookable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    pub start_minute: u32,
    pub end_minute: u32,
    /// Unix millis
    pub start_at: i64,
    /// Unix millis (exclusive)
    pub end_at: i64,
}

/// Why a specific start time is not bookable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRejection {
    /// Staff member has no active working-hour rule that weekday
    OffDay,
    /// `[start, start + duration)` is not inside the working hours
    OutsideWorkingHours,
    /// The local start time does not exist in the salon timezone
    NonexistentLocalTime,
    OutsideBookingWindow,
    /// Overlaps an existing appointment
    Overlaps,
}

/// Inputs of one availability computation
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery<'a> {
    pub service: &'a Service,
    pub staff: &'a StaffMember,
    pub date: NaiveDate,
    pub busy: &'a [BusyInterval],
    pub now: i64,
    pub policy: &'a SalonPolicy,
    pub granularity_minutes: u32,
}

impl<'a> SlotQuery<'a> {
    /// Open slots in ascending start order
    ///
    /// Empty when the staff member is off that day, or when the staff member
    /// or the service is inactive.
    pub fn slots(&self) -> Slots<'a> {
        let bookable = self.staff.is_active && self.service.is_active && self.service.duration_minutes > 0;
        let hours = if bookable {
            self.staff.schedule.hours_on(self.date)
        } else {
            None
        };
        Slots {
            query: *self,
            next: hours.map(|h| h.start).unwrap_or(0),
            hours,
        }
    }

    /// Check one start time, regardless of granularity alignment
    ///
    /// This is the same test `slots` applies to each candidate; the
    /// reservation core runs it again against freshly read busy intervals.
    pub fn check(&self, start_minute: u32) -> Result<Slot, SlotRejection> {
        let hours = self
            .staff
            .schedule
            .hours_on(self.date)
            .ok_or(SlotRejection::OffDay)?;
        self.check_within(hours, start_minute)
    }

    fn check_within(&self, hours: MinuteRange, start_minute: u32) -> Result<Slot, SlotRejection> {
        let wanted = MinuteRange::starting_at(start_minute, self.service.duration_minutes)
            .map_err(|_| SlotRejection::OutsideWorkingHours)?;
        if !hours.covers(&wanted) {
            return Err(SlotRejection::OutsideWorkingHours);
        }

        let start_at = local_minute_to_millis(self.date, wanted.start, self.policy.timezone)
            .ok_or(SlotRejection::NonexistentLocalTime)?;
        let end_at = start_at + minutes_to_millis(i64::from(self.service.duration_minutes));

        if !within_booking_window(start_at, self.policy, self.now) {
            return Err(SlotRejection::OutsideBookingWindow);
        }
        if self.busy.iter().any(|b| b.overlaps(start_at, end_at)) {
            return Err(SlotRejection::Overlaps);
        }

        Ok(Slot {
            start_minute: wanted.start,
            end_minute: wanted.end,
            start_at,
            end_at,
        })
    }
}

/// Lazy iterator over the open slots of a [`SlotQuery`]
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    query: SlotQuery<'a>,
    hours: Option<MinuteRange>,
    next: u32,
}

impl Iterator for Slots<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let hours = self.hours?;
        let step = self.query.granularity_minutes.max(1);
        let duration = self.query.service.duration_minutes;

        while self.next.saturating_add(duration) <= hours.end {
            let start = self.next;
            self.next = self.next.saturating_add(step);
            if let Ok(slot) = self.query.check_within(hours, start) {
                return Some(slot);
            }
        }

        self.hours = None;
        None
    }
}

/// Compute the open slots for a (service, staff, date) triple
pub fn compute_slots<'a>(
    service: &'a Service,
    staff: &'a StaffMember,
    date: NaiveDate,
    busy: &'a [BusyInterval],
    now: i64,
    policy: &'a SalonPolicy,
    granularity_minutes: u32,
) -> Slots<'a> {
    SlotQuery {
        service,
        staff,
        date,
        busy,
        now,
        policy,
        granularity_minutes,
    }
    .slots()
}
