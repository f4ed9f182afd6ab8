//! Cancel command handler
//!
//! Any non-terminal status → CANCELLED. The refund decision is made here,
//! against the command's timestamp, and recorded on the event.

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};
use crate::policy::evaluate_cancellation;

/// Cancel action
#[derive(Debug, Clone)]
pub struct CancelAction {
    pub appointment_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for CancelAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(
            &snapshot,
            Transition::Cancel,
            &[
                AppointmentStatus::Pending,
                AppointmentStatus::Confirmed,
                AppointmentStatus::InProgress,
            ],
        )?;

        let outcome = evaluate_cancellation(&snapshot, metadata.timestamp);

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Cancelled,
            EventPayload::Cancelled {
                reason: self.reason.clone(),
                outcome,
            },
        )])
    }
}
