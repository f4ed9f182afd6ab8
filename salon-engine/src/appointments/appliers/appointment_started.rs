//! Started event applier

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Started applier
pub struct AppointmentStartedApplier;

impl EventApplier for AppointmentStartedApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Started = &event.payload {
            snapshot.status = AppointmentStatus::InProgress;
            touch(snapshot, event);
        }
    }
}
