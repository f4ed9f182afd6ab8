//! Complete command handler (IN_PROGRESS → COMPLETED)

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};

/// Complete action
#[derive(Debug, Clone)]
pub struct CompleteAction {
    pub appointment_id: String,
}

impl CommandHandler for CompleteAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(&snapshot, Transition::Complete, &[AppointmentStatus::InProgress])?;

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Completed,
            EventPayload::Completed,
        )])
    }
}
