//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;
use shared::appointment::{AppointmentEvent, AppointmentSnapshot, EventPayload};

use crate::appointments::traits::EventApplier;

mod appointment_cancelled;
mod appointment_completed;
mod appointment_confirmed;
mod appointment_reserved;
mod appointment_started;
mod deposit_paid;
mod marked_no_show;
mod rescheduled;

pub use appointment_cancelled::AppointmentCancelledApplier;
pub use appointment_completed::AppointmentCompletedApplier;
pub use appointment_confirmed::AppointmentConfirmedApplier;
pub use appointment_reserved::AppointmentReservedApplier;
pub use appointment_started::AppointmentStartedApplier;
pub use deposit_paid::DepositPaidApplier;
pub use marked_no_show::MarkedNoShowApplier;
pub use rescheduled::RescheduledApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    Reserved(AppointmentReservedApplier),
    DepositPaid(DepositPaidApplier),
    Confirmed(AppointmentConfirmedApplier),
    Started(AppointmentStartedApplier),
    Completed(AppointmentCompletedApplier),
    Rescheduled(RescheduledApplier),
    Cancelled(AppointmentCancelledApplier),
    MarkedNoShow(MarkedNoShowApplier),
}

/// Convert AppointmentEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&AppointmentEvent> for EventAction {
    fn from(event: &AppointmentEvent) -> Self {
        match &event.payload {
            EventPayload::Reserved { .. } => EventAction::Reserved(AppointmentReservedApplier),
            EventPayload::DepositPaid { .. } => EventAction::DepositPaid(DepositPaidApplier),
            EventPayload::Confirmed => EventAction::Confirmed(AppointmentConfirmedApplier),
            EventPayload::Started => EventAction::Started(AppointmentStartedApplier),
            EventPayload::Completed => EventAction::Completed(AppointmentCompletedApplier),
            EventPayload::Rescheduled { .. } => EventAction::Rescheduled(RescheduledApplier),
            EventPayload::Cancelled { .. } => EventAction::Cancelled(AppointmentCancelledApplier),
            EventPayload::MarkedNoShow { .. } => EventAction::MarkedNoShow(MarkedNoShowApplier),
        }
    }
}

/// Bookkeeping every applied event performs
fn touch(snapshot: &mut AppointmentSnapshot, event: &AppointmentEvent) {
    snapshot.last_sequence = event.sequence;
    snapshot.updated_at = event.timestamp;
    snapshot.version += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::appointment::AppointmentEventType;

    #[test]
    fn test_touch_bumps_version_and_sequence() {
        let mut snapshot = AppointmentSnapshot::new("apt-1".to_string());
        let event = AppointmentEvent::new(
            9,
            "apt-1".to_string(),
            "desk".to_string(),
            "cmd-1".to_string(),
            42,
            AppointmentEventType::Confirmed,
            EventPayload::Confirmed,
        );

        let applier: EventAction = (&event).into();
        applier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.last_sequence, 9);
        assert_eq!(snapshot.updated_at, 42);
    }
}
