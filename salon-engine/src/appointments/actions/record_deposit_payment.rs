//! RecordDepositPayment command handler
//!
//! The payment collaborator reports that the deposit was captured.

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};

/// RecordDepositPayment action
#[derive(Debug, Clone)]
pub struct RecordDepositPaymentAction {
    pub appointment_id: String,
}

impl CommandHandler for RecordDepositPaymentAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(
            &snapshot,
            Transition::RecordDepositPayment,
            &[AppointmentStatus::Pending, AppointmentStatus::Confirmed],
        )?;

        if !snapshot.terms.deposit_required() {
            return Err(AppointmentError::PolicyViolation(format!(
                "appointment {} was booked without a deposit",
                snapshot.appointment_id
            )));
        }
        if snapshot.deposit_paid {
            return Err(AppointmentError::PolicyViolation(format!(
                "deposit for {} is already recorded",
                snapshot.appointment_id
            )));
        }

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::DepositPaid,
            EventPayload::DepositPaid {
                amount: snapshot.terms.deposit_amount,
            },
        )])
    }
}
