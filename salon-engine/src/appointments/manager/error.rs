use shared::appointment::{AppointmentStatus, CommandError, CommandErrorCode, Transition};
use thiserror::Error;

use super::super::storage::StorageError;
use super::super::traits::AppointmentError;

/// Outcome of a rejected or failed operation
///
/// Every business rejection has its own variant so callers can match on
/// the reason. `Unavailable` is the only infrastructure failure.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Slot no longer available: {0}")]
    SlotNoLongerAvailable(String),

    #[error("Start time is outside the booking window")]
    OutsideBookingWindow,

    #[error("Staff member is inactive: {0}")]
    StaffInactive(String),

    #[error("Service {service_id} is not offered by staff member {staff_id}")]
    ServiceNotOfferedByStaff { service_id: String, staff_id: String },

    #[error("Cannot {transition} appointment {appointment_id} in status {status}")]
    InvalidTransition {
        appointment_id: String,
        status: AppointmentStatus,
        transition: Transition,
    },

    #[error("Too early to {transition} appointment {appointment_id}")]
    TooEarly {
        appointment_id: String,
        transition: Transition,
    },

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Staff member not found: {0}")]
    StaffNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Appointment store unavailable: {0}")]
    Unavailable(#[from] StorageError),
}

impl ManagerError {
    /// A business rule said no; nothing is wrong with the system
    pub fn is_rejection(&self) -> bool {
        !matches!(self, ManagerError::Unavailable(_))
    }
}

/// Map a storage error to an error code
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    match e {
        StorageError::Serialization(_) => return CommandErrorCode::InternalError,
        StorageError::IntervalConflict { .. } | StorageError::VersionConflict { .. } => {
            return CommandErrorCode::Unavailable;
        }
        _ => {}
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc") {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    CommandErrorCode::Unavailable
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let code = match &err {
            ManagerError::Unavailable(e) => {
                let code = classify_storage_error(e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                code
            }
            ManagerError::SlotNoLongerAvailable(_) => CommandErrorCode::SlotNoLongerAvailable,
            ManagerError::OutsideBookingWindow => CommandErrorCode::OutsideBookingWindow,
            ManagerError::StaffInactive(_) => CommandErrorCode::StaffInactive,
            ManagerError::ServiceNotOfferedByStaff { .. } => CommandErrorCode::ServiceNotOfferedByStaff,
            ManagerError::InvalidTransition { .. } => CommandErrorCode::InvalidTransition,
            ManagerError::TooEarly { .. } => CommandErrorCode::TooEarly,
            ManagerError::PolicyViolation(_) => CommandErrorCode::PolicyViolation,
            ManagerError::AppointmentNotFound(_) => CommandErrorCode::AppointmentNotFound,
            ManagerError::ServiceNotFound(_) => CommandErrorCode::ServiceNotFound,
            ManagerError::StaffNotFound(_) => CommandErrorCode::StaffNotFound,
            ManagerError::InvalidRequest(_) => CommandErrorCode::InvalidRequest,
        };
        CommandError::new(code, err.to_string())
    }
}

impl From<AppointmentError> for ManagerError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::AppointmentNotFound(id) => ManagerError::AppointmentNotFound(id),
            AppointmentError::SlotNoLongerAvailable(msg) => ManagerError::SlotNoLongerAvailable(msg),
            AppointmentError::OutsideBookingWindow => ManagerError::OutsideBookingWindow,
            AppointmentError::StaffInactive(id) => ManagerError::StaffInactive(id),
            AppointmentError::ServiceNotOfferedByStaff { service_id, staff_id } => {
                ManagerError::ServiceNotOfferedByStaff { service_id, staff_id }
            }
            AppointmentError::InvalidTransition {
                appointment_id,
                status,
                transition,
            } => ManagerError::InvalidTransition {
                appointment_id,
                status,
                transition,
            },
            AppointmentError::TooEarly {
                appointment_id,
                transition,
            } => ManagerError::TooEarly {
                appointment_id,
                transition,
            },
            AppointmentError::PolicyViolation(msg) => ManagerError::PolicyViolation(msg),
            AppointmentError::InvalidRequest(msg) => ManagerError::InvalidRequest(msg),
            AppointmentError::Storage(e) => ManagerError::Unavailable(e),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
