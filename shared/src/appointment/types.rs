//! Shared types for appointment command processing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::SalonPolicy;

// ============================================================================
// Status
// ============================================================================

/// Appointment lifecycle status
///
/// `Pending` is initial; `Completed`, `Cancelled` and `NoShow` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether an appointment in this status holds its staff member's time
    pub fn occupies_slot(self) -> bool {
        self != AppointmentStatus::Cancelled
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        };
        f.write_str(s)
    }
}

/// Lifecycle transitions, named for error reporting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    RecordDepositPayment,
    Confirm,
    Begin,
    Complete,
    Reschedule,
    Cancel,
    MarkNoShow,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Transition::RecordDepositPayment => "record_deposit_payment",
            Transition::Confirm => "confirm",
            Transition::Begin => "begin",
            Transition::Complete => "complete",
            Transition::Reschedule => "reschedule",
            Transition::Cancel => "cancel",
            Transition::MarkNoShow => "mark_no_show",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Frozen policy terms
// ============================================================================

/// Policy fields frozen onto an appointment when it is reserved
///
/// Later policy changes never reach existing appointments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingTerms {
    pub policy_version: u64,
    pub deposit_amount: Decimal,
    pub deposit_refundable: bool,
    pub cancellation_cutoff_minutes: i64,
}

impl BookingTerms {
    pub fn from_policy(policy: &SalonPolicy) -> Self {
        Self {
            policy_version: policy.version,
            deposit_amount: policy.deposit_amount,
            deposit_refundable: policy.deposit_refundable,
            cancellation_cutoff_minutes: policy.cancellation_cutoff_minutes,
        }
    }

    pub fn deposit_required(&self) -> bool {
        self.deposit_amount > Decimal::ZERO
    }
}

/// Refund decision recorded when an appointment is cancelled or marked no-show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub refundable: bool,
    /// Amount the payment collaborator should refund
    pub refund_amount: Decimal,
    /// Deposit kept by the salon
    pub forfeited_amount: Decimal,
    /// Unix millis at which the decision was made
    pub decided_at: i64,
}

// ============================================================================
// Command Response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Appointment the command created or changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, appointment_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            appointment_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            appointment_id: None,
            error: Some(error),
        }
    }

    /// Re-submitted command; reports the appointment the first run produced
    pub fn duplicate(command_id: String, appointment_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            appointment_id,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    // Business rejections
    SlotNoLongerAvailable,
    OutsideBookingWindow,
    StaffInactive,
    ServiceNotOfferedByStaff,
    InvalidTransition,
    TooEarly,
    PolicyViolation,
    // Lookups and input
    AppointmentNotFound,
    ServiceNotFound,
    StaffNotFound,
    InvalidRequest,
    // Infrastructure
    Unavailable,
    StorageFull,
    StorageCorrupted,
    InternalError,
}
