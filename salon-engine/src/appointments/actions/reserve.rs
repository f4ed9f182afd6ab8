//! Reserve command handler
//!
//! Claims a slot and creates a PENDING appointment. Busy intervals are read
//! inside the write transaction, so the availability check and the commit
//! see the same calendar.

use chrono::NaiveDate;
use shared::appointment::{AppointmentEvent, AppointmentEventType, BookingTerms, EventPayload};
use shared::calendar::MINUTES_PER_DAY;
use shared::models::{CustomerInfo, SalonPolicy, Service, StaffMember};

use crate::appointments::traits::{AppointmentError, CommandContext, CommandHandler, CommandMetadata};
use crate::availability::SlotQuery;

/// Reserve action
///
/// Catalog entries and the policy are read by the manager before the
/// transaction and handed in here.
#[derive(Debug, Clone)]
pub struct ReserveAction {
    pub appointment_id: String,
    pub service: Service,
    pub staff: StaffMember,
    pub policy: SalonPolicy,
    pub date: NaiveDate,
    pub start_minute: u32,
    pub customer: CustomerInfo,
    pub notes: Option<String>,
}

/// Checks shared by reserve and reschedule, before any calendar read
pub(super) fn check_assignment(service: &Service, staff: &StaffMember) -> Result<(), AppointmentError> {
    if service.duration_minutes == 0 {
        return Err(AppointmentError::InvalidRequest(format!(
            "service {} has no duration",
            service.id
        )));
    }
    if !service.is_active {
        return Err(AppointmentError::InvalidRequest(format!(
            "service {} is not bookable",
            service.id
        )));
    }
    if !staff.is_active {
        return Err(AppointmentError::StaffInactive(staff.id.clone()));
    }
    if !service.is_offered_by(&staff.id) {
        return Err(AppointmentError::ServiceNotOfferedByStaff {
            service_id: service.id.clone(),
            staff_id: staff.id.clone(),
        });
    }
    Ok(())
}

pub(super) fn check_start_minute(start_minute: u32) -> Result<(), AppointmentError> {
    if start_minute >= MINUTES_PER_DAY {
        return Err(AppointmentError::InvalidRequest(format!(
            "start minute {start_minute} is outside the day"
        )));
    }
    Ok(())
}

impl CommandHandler for ReserveAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        // 1. Static checks
        check_start_minute(self.start_minute)?;
        check_assignment(&self.service, &self.staff)?;
        if self.customer.name.trim().is_empty() {
            return Err(AppointmentError::InvalidRequest("customer name is required".into()));
        }

        // 2. Re-derive busy intervals and re-run the availability check
        let busy = ctx.busy_intervals(&self.staff.id, self.date)?;
        let query = SlotQuery {
            service: &self.service,
            staff: &self.staff,
            date: self.date,
            busy: &busy,
            now: metadata.timestamp,
            policy: &self.policy,
            granularity_minutes: 1,
        };
        let slot = query.check(self.start_minute)?;

        // 3. Emit
        let seq = ctx.next_sequence();
        let event = AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Reserved,
            EventPayload::Reserved {
                service_id: self.service.id.clone(),
                service_name: self.service.name.clone(),
                staff_id: self.staff.id.clone(),
                customer: self.customer.clone(),
                date: self.date,
                start_minute: slot.start_minute,
                end_minute: slot.end_minute,
                start_at: slot.start_at,
                end_at: slot.end_at,
                terms: BookingTerms::from_policy(&self.policy),
                notes: self.notes.clone(),
            },
        );

        Ok(vec![event])
    }
}
