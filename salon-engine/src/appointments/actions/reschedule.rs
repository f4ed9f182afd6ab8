//! Reschedule command handler
//!
//! Moves a PENDING or CONFIRMED appointment to another slot with the same
//! staff member. The new slot is validated exactly like a fresh booking,
//! ignoring the appointment's own current interval.

use chrono::NaiveDate;
use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};
use shared::models::{SalonPolicy, Service, StaffMember};

use super::reserve::{check_assignment, check_start_minute};
use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};
use crate::availability::SlotQuery;

/// Reschedule action
#[derive(Debug, Clone)]
pub struct RescheduleAction {
    pub appointment_id: String,
    pub service: Service,
    pub staff: StaffMember,
    pub policy: SalonPolicy,
    pub new_date: NaiveDate,
    pub new_start_minute: u32,
}

impl CommandHandler for RescheduleAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(
            &snapshot,
            Transition::Reschedule,
            &[AppointmentStatus::Pending, AppointmentStatus::Confirmed],
        )?;
        if snapshot.staff_id != self.staff.id {
            return Err(AppointmentError::InvalidRequest(format!(
                "appointment {} belongs to staff member {}",
                snapshot.appointment_id, snapshot.staff_id
            )));
        }
        check_start_minute(self.new_start_minute)?;
        check_assignment(&self.service, &self.staff)?;

        let busy: Vec<_> = ctx
            .busy_intervals(&self.staff.id, self.new_date)?
            .into_iter()
            .filter(|b| b.appointment_id != snapshot.appointment_id)
            .collect();
        let query = SlotQuery {
            service: &self.service,
            staff: &self.staff,
            date: self.new_date,
            busy: &busy,
            now: metadata.timestamp,
            policy: &self.policy,
            granularity_minutes: 1,
        };
        let slot = query.check(self.new_start_minute)?;

        let seq = ctx.next_sequence();
        let event = AppointmentEvent::new(
            seq,
            snapshot.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Rescheduled,
            EventPayload::Rescheduled {
                previous_date: snapshot.date,
                previous_start_minute: snapshot.start_minute,
                previous_start_at: snapshot.start_at,
                previous_end_at: snapshot.end_at,
                date: self.new_date,
                start_minute: slot.start_minute,
                end_minute: slot.end_minute,
                start_at: slot.start_at,
                end_at: slot.end_at,
            },
        );

        Ok(vec![event])
    }
}
