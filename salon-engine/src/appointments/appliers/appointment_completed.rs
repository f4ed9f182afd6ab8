//! Completed event applier

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Completed applier
pub struct AppointmentCompletedApplier;

impl EventApplier for AppointmentCompletedApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Completed = &event.payload {
            snapshot.status = AppointmentStatus::Completed;
            touch(snapshot, event);
        }
    }
}
