//! MarkNoShow command handler
//!
//! PENDING or CONFIRMED → NO_SHOW once the start time has passed without the
//! appointment being begun. The deposit is always forfeited.

use shared::appointment::{AppointmentEvent, AppointmentEventType, AppointmentStatus, EventPayload, Transition};

use crate::appointments::traits::{
    AppointmentError, CommandContext, CommandHandler, CommandMetadata, require_status,
};
use crate::policy::evaluate_no_show;

/// MarkNoShow action
///
/// IN_PROGRESS is not accepted: a begun appointment means the customer came.
#[derive(Debug, Clone)]
pub struct MarkNoShowAction {
    pub appointment_id: String,
}

impl CommandHandler for MarkNoShowAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        let snapshot = ctx.load_snapshot(&self.appointment_id)?;
        require_status(
            &snapshot,
            Transition::MarkNoShow,
            &[AppointmentStatus::Pending, AppointmentStatus::Confirmed],
        )?;

        if metadata.timestamp < snapshot.start_at {
            return Err(AppointmentError::TooEarly {
                appointment_id: snapshot.appointment_id,
                transition: Transition::MarkNoShow,
            });
        }

        let outcome = evaluate_no_show(&snapshot, metadata.timestamp);

        let seq = ctx.next_sequence();
        Ok(vec![AppointmentEvent::new(
            seq,
            self.appointment_id.clone(),
            metadata.operator_id.clone(),
            metadata.command_id.clone(),
            metadata.timestamp,
            AppointmentEventType::MarkedNoShow,
            EventPayload::MarkedNoShow { outcome },
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
    fn test_no_show_before_start_is_too_early() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &booked("apt-1", AppointmentStatus::Confirmed, at(16, 10, 0)))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = MarkNoShowAction {
            appointment_id: "apt-1".to_string(),
        };

        assert!(matches!(
            action.execute(&mut ctx, &metadata(at(16, 9, 59))),
            Err(AppointmentError::TooEarly { .. })
        ));
        assert!(action.execute(&mut ctx, &metadata(at(16, 10, 0))).is_ok());
    }

    #[test]
    fn test_no_show_forfeits_refundable_deposit() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snapshot = booked("apt-1", AppointmentStatus::Confirmed, at(16, 10, 0));
        snapshot.terms.deposit_amount = Decimal::new(1000, 2);
        snapshot.terms.deposit_refundable = true;
        snapshot.deposit_paid = true;
        storage.store_snapshot(&txn, &snapshot).unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = MarkNoShowAction {
            appointment_id: "apt-1".to_string(),
        }
        .execute(&mut ctx, &metadata(at(16, 10, 30)))
        .unwrap();

        match &events[0].payload {
            EventPayload::MarkedNoShow { outcome } => {
                assert!(!outcome.refundable);
                assert_eq!(outcome.forfeited_amount, Decimal::new(1000, 2));
                assert_eq!(outcome.refund_amount, Decimal::ZERO);
            }
            other => panic!("Expected MarkedNoShow payload, got {other:?}"),
        }
    }

    #[test]
    fn test_no_show_after_begin_is_invalid() {
        let storage = AppointmentStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &booked("apt-1", AppointmentStatus::InProgress, at(16, 10, 0)))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let err = MarkNoShowAction {
            appointment_id: "apt-1".to_string(),
        }
        .execute(&mut ctx, &metadata(at(16, 10, 30)))
        .unwrap_err();
        assert!(matches!(err, AppointmentError::InvalidTransition { .. }));
    }
}
