//! MarkedNoShow event applier

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// MarkedNoShow applier
pub struct MarkedNoShowApplier;

impl EventApplier for MarkedNoShowApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::MarkedNoShow { outcome } = &event.payload {
            snapshot.status = AppointmentStatus::NoShow;
            snapshot.cancellation = Some(outcome.clone());
            touch(snapshot, event);
        }
    }
}
