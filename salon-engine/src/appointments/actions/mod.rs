//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use shared::appointment::{AppointmentCommand, AppointmentCommandPayload, AppointmentEvent};
use shared::models::{SalonPolicy, Service, StaffMember};

use crate::appointments::traits::{AppointmentError, CommandContext, CommandHandler, CommandMetadata};

mod begin;
mod cancel;
mod complete;
mod confirm;
mod mark_no_show;
mod record_deposit_payment;
mod reschedule;
mod reserve;

pub use begin::BeginAction;
pub use cancel::CancelAction;
pub use complete::CompleteAction;
pub use confirm::ConfirmAction;
pub use mark_no_show::MarkNoShowAction;
pub use record_deposit_payment::RecordDepositPaymentAction;
pub use reschedule::RescheduleAction;
pub use reserve::ReserveAction;

/// CommandAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum CommandAction {
    Reserve(ReserveAction),
    RecordDepositPayment(RecordDepositPaymentAction),
    Confirm(ConfirmAction),
    Begin(BeginAction),
    Complete(CompleteAction),
    Reschedule(RescheduleAction),
    Cancel(CancelAction),
    MarkNoShow(MarkNoShowAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<AppointmentEvent>, AppointmentError> {
        match self {
            CommandAction::Reserve(action) => action.execute(ctx, metadata),
            CommandAction::RecordDepositPayment(action) => action.execute(ctx, metadata),
            CommandAction::Confirm(action) => action.execute(ctx, metadata),
            CommandAction::Begin(action) => action.execute(ctx, metadata),
            CommandAction::Complete(action) => action.execute(ctx, metadata),
            CommandAction::Reschedule(action) => action.execute(ctx, metadata),
            CommandAction::Cancel(action) => action.execute(ctx, metadata),
            CommandAction::MarkNoShow(action) => action.execute(ctx, metadata),
        }
    }
}

/// Everything an action needs from outside the transaction
///
/// Loaded by the manager before the staff lock is taken.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    /// Id for a new appointment (used by `Reserve` only)
    pub new_appointment_id: String,
    pub service: Option<Service>,
    pub staff: Option<StaffMember>,
    pub policy: SalonPolicy,
    pub begin_tolerance_minutes: i64,
}

impl CommandAction {
    /// Convert a command into its action
    ///
    /// This is the ONLY place with a match on AppointmentCommandPayload.
    pub fn from_command(cmd: &AppointmentCommand, inputs: ActionInputs) -> Result<Self, AppointmentError> {
        let action = match &cmd.payload {
            AppointmentCommandPayload::Reserve {
                date,
                start_minute,
                customer,
                notes,
                ..
            } => {
                let (service, staff) = require_catalog(inputs.service, inputs.staff)?;
                CommandAction::Reserve(ReserveAction {
                    appointment_id: inputs.new_appointment_id,
                    service,
                    staff,
                    policy: inputs.policy,
                    date: *date,
                    start_minute: *start_minute,
                    customer: customer.clone(),
                    notes: notes.clone(),
                })
            }
            AppointmentCommandPayload::RecordDepositPayment { appointment_id } => {
                CommandAction::RecordDepositPayment(RecordDepositPaymentAction {
                    appointment_id: appointment_id.clone(),
                })
            }
            AppointmentCommandPayload::Confirm { appointment_id } => CommandAction::Confirm(ConfirmAction {
                appointment_id: appointment_id.clone(),
            }),
            AppointmentCommandPayload::Begin { appointment_id } => CommandAction::Begin(BeginAction {
                appointment_id: appointment_id.clone(),
                tolerance_minutes: inputs.begin_tolerance_minutes,
            }),
            AppointmentCommandPayload::Complete { appointment_id } => CommandAction::Complete(CompleteAction {
                appointment_id: appointment_id.clone(),
            }),
            AppointmentCommandPayload::Reschedule {
                appointment_id,
                new_date,
                new_start_minute,
            } => {
                let (service, staff) = require_catalog(inputs.service, inputs.staff)?;
                CommandAction::Reschedule(RescheduleAction {
                    appointment_id: appointment_id.clone(),
                    service,
                    staff,
                    policy: inputs.policy,
                    new_date: *new_date,
                    new_start_minute: *new_start_minute,
                })
            }
            AppointmentCommandPayload::Cancel { appointment_id, reason } => CommandAction::Cancel(CancelAction {
                appointment_id: appointment_id.clone(),
                reason: reason.clone(),
            }),
            AppointmentCommandPayload::MarkNoShow { appointment_id } => {
                CommandAction::MarkNoShow(MarkNoShowAction {
                    appointment_id: appointment_id.clone(),
                })
            }
        };
        Ok(action)
    }
}

fn require_catalog(
    service: Option<Service>,
    staff: Option<StaffMember>,
) -> Result<(Service, StaffMember), AppointmentError> {
    match (service, staff) {
        (Some(service), Some(staff)) => Ok((service, staff)),
        _ => Err(AppointmentError::InvalidRequest(
            "service and staff member must be resolved before claiming a slot".into(),
        )),
    }
}
