//! Cancelled event applier
//!
//! Records the frozen refund decision; it is never recomputed.

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Cancelled applier
pub struct AppointmentCancelledApplier;

impl EventApplier for AppointmentCancelledApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Cancelled { outcome, .. } = &event.payload {
            snapshot.status = AppointmentStatus::Cancelled;
            snapshot.cancellation = Some(outcome.clone());
            touch(snapshot, event);
        }
    }
}
