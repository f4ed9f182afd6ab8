//! DepositPaid event applier

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// DepositPaid applier
pub struct DepositPaidApplier;

impl EventApplier for DepositPaidApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::DepositPaid { .. } = &event.payload {
            snapshot.deposit_paid = true;
            touch(snapshot, event);
        }
    }
}
