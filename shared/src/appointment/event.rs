//! Appointment events - immutable facts recorded after command processing

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BookingTerms, CancellationOutcome};
use crate::models::CustomerInfo;

/// Appointment event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Appointment this event belongs to
    pub appointment_id: String,
    /// Unix millis of the command that produced this event
    pub timestamp: i64,
    /// Who issued the command
    pub operator_id: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    pub event_type: AppointmentEventType,
    pub payload: EventPayload,
}

impl AppointmentEvent {
    pub fn new(
        sequence: u64,
        appointment_id: String,
        operator_id: String,
        command_id: String,
        timestamp: i64,
        event_type: AppointmentEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: crate::util::new_id(),
            sequence,
            appointment_id,
            timestamp,
            operator_id,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentEventType {
    Reserved,
    DepositPaid,
    Confirmed,
    Started,
    Completed,
    Rescheduled,
    Cancelled,
    MarkedNoShow,
}

impl std::fmt::Display for AppointmentEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentEventType::Reserved => write!(f, "RESERVED"),
            AppointmentEventType::DepositPaid => write!(f, "DEPOSIT_PAID"),
            AppointmentEventType::Confirmed => write!(f, "CONFIRMED"),
            AppointmentEventType::Started => write!(f, "STARTED"),
            AppointmentEventType::Completed => write!(f, "COMPLETED"),
            AppointmentEventType::Rescheduled => write!(f, "RESCHEDULED"),
            AppointmentEventType::Cancelled => write!(f, "CANCELLED"),
            AppointmentEventType::MarkedNoShow => write!(f, "MARKED_NO_SHOW"),
        }
    }
}

/// Event payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    Reserved {
        service_id: String,
        service_name: String,
        staff_id: String,
        customer: CustomerInfo,
        date: NaiveDate,
        start_minute: u32,
        end_minute: u32,
        start_at: i64,
        end_at: i64,
        terms: BookingTerms,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    DepositPaid {
        amount: Decimal,
    },
    Confirmed,
    Started,
    Completed,
    Rescheduled {
        previous_date: NaiveDate,
        previous_start_minute: u32,
        previous_start_at: i64,
        previous_end_at: i64,
        date: NaiveDate,
        start_minute: u32,
        end_minute: u32,
        start_at: i64,
        end_at: i64,
    },
    Cancelled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        outcome: CancellationOutcome,
    },
    MarkedNoShow {
        outcome: CancellationOutcome,
    },
}
