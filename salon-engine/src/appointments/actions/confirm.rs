//! Confirm command handler
//!
//! PENDING → CONFIRMED. When the booking terms carry a deposit, it must have
//! been recorded as paid first.

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};

/// Confirm action
#[derive(Debug, Clone)]
pub struct ConfirmAction {
    pub appointment_id: String,
}

impl CommandHandler for ConfirmAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(&snapshot, Transition::Confirm, &[AppointmentStatus::Pending])?;

        if snapshot.terms.deposit_required() && !snapshot.deposit_paid {
            return Err(AppointmentError::PolicyViolation(format!(
                "deposit of {} for {} has not been paid",
                snapshot.terms.deposit_amount, snapshot.appointment_id
            )));
        }

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::Confirmed,
            EventPayload::Confirmed,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::actions::tests::{at, booked, metadata};
    use crate::appointments::storage::AppointmentStorage;
    use rust_decimal::Decimal;

    #[test]
    fn test_confirm_requires_paid_deposit() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snapshot = booked("apt-1", AppointmentStatus::Pending, at(16, 10, 0));
        snapshot.terms.deposit_amount = Decimal::new(1500, 2);
        storage.store_snapshot(&txn, &snapshot).unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = ConfirmAction {
            appointment_id: "apt-1".to_string(),
        };

        let err = action.execute(&mut ctx, &metadata(at(15, 9, 0))).unwrap_err();
        assert!(matches!(err, AppointmentError::PolicyViolation(_)));

        snapshot.deposit_paid = true;
        ctx.save_snapshot(snapshot);
        let events = action.execute(&mut ctx, &metadata(at(15, 9, 0))).unwrap();
        assert_eq!(events[0].event_type, AppointmentEventType::Confirmed);
    }

    #[test]
    fn test_confirm_twice_is_invalid() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &booked("apt-1", AppointmentStatus::Confirmed, at(16, 10, 0)))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let err = ConfirmAction {
            appointment_id: "apt-1".to_string(),
        }
        .execute(&mut ctx, &metadata(at(15, 9, 0)))
        .unwrap_err();
        assert!(matches!(err, AppointmentError::InvalidTransition { .. }));
    }
}
