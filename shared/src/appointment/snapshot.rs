//! Appointment snapshot - current state computed from the event stream

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AppointmentStatus, BookingTerms, CancellationOutcome};
use crate::calendar::BusyInterval;
use crate::models::CustomerInfo;

/// The appointment record
///
/// Created by a successful reservation and changed only by applying events.
/// Never deleted: terminal appointments stay for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSnapshot {
    pub appointment_id: String,
    pub service_id: String,
    pub service_name: String,
    pub staff_id: String,
    pub customer: CustomerInfo,
    /// Calendar date in the salon timezone
    pub date: NaiveDate,
    /// Minute-of-day the appointment starts
    pub start_minute: u32,
    /// Minute-of-day the appointment ends (start + service duration)
    pub end_minute: u32,
    /// Start instant (Unix millis)
    pub start_at: i64,
    /// End instant (Unix millis, exclusive)
    pub end_at: i64,
    pub status: AppointmentStatus,
    /// Policy terms frozen at reservation
    pub terms: BookingTerms,
    pub deposit_paid: bool,
    /// Refund decision, set once by cancel or no-show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<CancellationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Incremented by every applied event; used for optimistic conflict detection
    pub version: u64,
    /// Sequence of the last applied event
    pub last_sequence: u64,
}

impl AppointmentSnapshot {
    pub fn new(appointment_id: String) -> Self {
        Self {
            appointment_id,
            service_id: String::new(),
            service_name: String::new(),
            staff_id: String::new(),
            customer: CustomerInfo::new("", ""),
            date: NaiveDate::MIN,
            start_minute: 0,
            end_minute: 0,
            start_at: 0,
            end_at: 0,
            status: AppointmentStatus::Pending,
            terms: BookingTerms::default(),
            deposit_paid: false,
            cancellation: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
            version: 0,
            last_sequence: 0,
        }
    }

    pub fn deposit_amount(&self) -> Decimal {
        self.terms.deposit_amount
    }

    pub fn deposit_refundable(&self) -> bool {
        self.terms.deposit_refundable
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// The staff time this appointment holds
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval::new(self.appointment_id.clone(), self.start_at, self.end_at)
    }
}
