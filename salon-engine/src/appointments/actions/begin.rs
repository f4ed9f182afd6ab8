//! Begin command handler
//!
//! CONFIRMED → IN_PROGRESS, at or after the scheduled start minus the
//! configured tolerance.

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};
use shared::util::minutes_to_millis;

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};

/// Begin action
#[derive(Debug, Clone)]
pub struct BeginAction {
    pub appointment_id: String,
    /// How many minutes before `start_at` the service may begin
    pub tolerance_minutes: i64,
}

impl CommandHandler for BeginAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(&snapshot, Transition::Begin, &[AppointmentStatus::Confirmed])?;

        let earliest = snapshot.start_at - minutes_to_millis(self.tolerance_minutes.max(0));
        if metadata.timestamp < earliest {
            return Err(AppointmentError::TooEarly {
                appointment_id: snapshot.appointment_id,
                transition: Transition::Begin,
            });
        }

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Started,
            EventPayload::Started,
        )])
    }
}
