//! Confirmed event applier

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Confirmed applier
pub struct AppointmentConfirmedApplier;

impl EventApplier for AppointmentConfirmedApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Confirmed = &event.payload {
            snapshot.status = AppointmentStatus::Confirmed;
            touch(snapshot, event);
        }
    }
}
