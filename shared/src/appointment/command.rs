//! Appointment commands - requests to reserve or change an appointment

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::CustomerInfo;

/// Appointment command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCommand {
    /// Unique command ID (idempotency key)
    pub command_id: String,
    /// Who issued the command (customer, staff member or system)
    pub operator_id: String,
    /// Issue time (Unix millis); the "now" every policy decision is made against
    pub timestamp: i64,
    pub payload: AppointmentCommandPayload,
}

impl AppointmentCommand {
    pub fn new(operator_id: impl Into<String>, payload: AppointmentCommandPayload) -> Self {
        Self {
            command_id: crate::util::new_id(),
            operator_id: operator_id.into(),
            timestamp: crate::util::now_millis(),
            payload,
        }
    }

    /// Override the issue time
    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Command payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentCommandPayload {
    /// Claim a slot and create a PENDING appointment
    Reserve {
        service_id: String,
        staff_id: String,
        date: NaiveDate,
        start_minute: u32,
        customer: CustomerInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    /// Payment collaborator captured the deposit
    RecordDepositPayment { appointment_id: String },
    Confirm { appointment_id: String },
    Begin { appointment_id: String },
    Complete { appointment_id: String },
    /// Move to another slot with the same staff member
    Reschedule {
        appointment_id: String,
        new_date: NaiveDate,
        new_start_minute: u32,
    },
    Cancel {
        appointment_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    MarkNoShow { appointment_id: String },
}

impl AppointmentCommandPayload {
    /// Target appointment, `None` for `Reserve`
    pub fn appointment_id(&self) -> Option<&str> {
        match self {
            AppointmentCommandPayload::Reserve { .. } => None,
            AppointmentCommandPayload::RecordDepositPayment { appointment_id }
            | AppointmentCommandPayload::Confirm { appointment_id }
            | AppointmentCommandPayload::Begin { appointment_id }
            | AppointmentCommandPayload::Complete { appointment_id }
            | AppointmentCommandPayload::Reschedule { appointment_id, .. }
            | AppointmentCommandPayload::Cancel { appointment_id, .. }
            | AppointmentCommandPayload::MarkNoShow { appointment_id } => Some(appointment_id),
        }
    }

    /// Whether the command claims a (new) slot
    pub fn claims_slot(&self) -> bool {
        matches!(
            self,
            AppointmentCommandPayload::Reserve { .. } | AppointmentCommandPayload::Reschedule { .. }
        )
    }
}
