//! Rescheduled event applier
//!
//! Moves the appointment; status, terms and deposit state are kept.

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Rescheduled applier
pub struct RescheduledApplier;

impl EventApplier for RescheduledApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Rescheduled {
            date,
            start_minute,
            end_minute,
            start_at,
            end_at,
            ..
        } = &event.payload
        {
            snapshot.date = *date;
            snapshot.start_minute = *start_minute;
            snapshot.end_minute = *end_minute;
            snapshot.start_at = *start_at;
            snapshot.end_at = *end_at;
            touch(snapshot, event);
        }
    }
}
