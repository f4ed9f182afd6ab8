//! Reserved event applier
//!
//! Fills in a fresh snapshot from the reservation.

use shared::appointment::{AppointmentEvent, AppointmentSnapshot, AppointmentStatus, EventPayload};

use super::touch;
use crate::appointments::traits::EventApplier;

/// Reserved applier
pub struct AppointmentReservedApplier;

impl EventApplier for AppointmentReservedApplier {
    fn apply(&self, snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
        if let EventPayload::Reserved {
            service_id,
            service_name,
            staff_id,
            customer,
            date,
            start_minute,
            end_minute,
            start_at,
            end_at,
            terms,
            notes,
        } = &event.payload
        {
            snapshot.appointment_id = event.appointment_id.clone();
            snapshot.service_id = service_id.clone();
            snapshot.service_name = service_name.clone();
            snapshot.staff_id = staff_id.clone();
            snapshot.customer = customer.clone();
            snapshot.date = *date;
            snapshot.start_minute = *start_minute;
            snapshot.end_minute = *end_minute;
            snapshot.start_at = *start_at;
            snapshot.end_at = *end_at;
            snapshot.status = AppointmentStatus::Pending;
            snapshot.terms = terms.clone();
            snapshot.deposit_paid = false;
            snapshot.cancellation = None;
            snapshot.notes = notes.clone();
            snapshot.created_at = event.timestamp;

            touch(snapshot, event);
        }
    }
}
